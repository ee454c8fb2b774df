//! GPIO pin assignments (BCM numbering) for the controller board.
//!
//! Single source of truth: every driver and log line references this
//! module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Indicators (PWM capable)
// ---------------------------------------------------------------------------

/// Red indicator: Morse dot / thermostat heat.
pub const RED_LED_GPIO: u8 = 18;
/// Blue indicator: Morse dash / thermostat cool.
pub const BLUE_LED_GPIO: u8 = 23;

// ---------------------------------------------------------------------------
// Buttons (active low, internal pull-up)
// ---------------------------------------------------------------------------

/// Morse: toggle message.  Thermostat: cycle mode.
pub const GREEN_BUTTON_GPIO: u8 = 24;
/// Thermostat: raise set point.
pub const RED_BUTTON_GPIO: u8 = 25;
/// Thermostat: lower set point.
pub const BLUE_BUTTON_GPIO: u8 = 12;

// ---------------------------------------------------------------------------
// 16x2 character LCD
// ---------------------------------------------------------------------------

pub const LCD_COLUMNS: usize = 16;
