//! Port traits — the hexagonal boundary between control logic and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Worker / ControlPolicy (domain)
//! ```
//!
//! Driven adapters (indicators, sensor, display, serial, buttons) implement
//! these traits.  Workers and policies take them as generics, so the core
//! never touches hardware directly and every port can be swapped for a
//! recording test double.

use core::fmt;

use crate::config::SystemConfig;
use crate::error::{DisplayError, InputError, SensorError, TelemetryError};

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// A binary indicator output that can also fade softly.
pub trait ActuatorPort {
    /// Fully on.
    fn on(&mut self);

    /// Fully off.
    fn off(&mut self);

    /// Periodic soft fade.  Re-issuing while already pulsing must not
    /// restart the fade.
    fn pulse(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Sensor port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Scalar measurement source.
pub trait SensorPort {
    /// Current temperature in degrees Celsius.
    fn read(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Display port (domain → character LCD)
// ───────────────────────────────────────────────────────────────

/// Two-line character display.
pub trait DisplayPort {
    /// Replace the whole screen with two lines.
    fn render(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError>;

    /// Blank the screen.
    fn clear(&mut self) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (domain → serial byte stream)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget status line output.  No terminator is appended.
pub trait TelemetryPort {
    fn emit(&mut self, line: &str) -> Result<(), TelemetryError>;
}

// ───────────────────────────────────────────────────────────────
// Input source (buttons → domain)
// ───────────────────────────────────────────────────────────────

/// Physical push buttons on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Green,
    Red,
    Blue,
}

impl Button {
    pub const ALL: [Button; 3] = [Self::Green, Self::Red, Self::Blue];

    /// Dense index for per-button handler slots.
    pub fn index(self) -> usize {
        match self {
            Self::Green => 0,
            Self::Red => 1,
            Self::Blue => 2,
        }
    }

    /// BCM GPIO the button is wired to.
    pub fn gpio(self) -> u8 {
        match self {
            Self::Green => crate::pins::GREEN_BUTTON_GPIO,
            Self::Red => crate::pins::RED_BUTTON_GPIO,
            Self::Blue => crate::pins::BLUE_BUTTON_GPIO,
        }
    }
}

/// Callback run on the input source's delivery thread for each press.
pub type PressHandler = Box<dyn Fn() + Send + 'static>;

/// Delivers debounced press events asynchronously.
///
/// At most one handler per button: registering again replaces the
/// previous one.  Delivery order across buttons is unspecified.
pub trait InputSource {
    fn on_press(&mut self, button: Button, handler: PressHandler);

    /// Begin delivering events on the source's own thread.
    fn start(&mut self) -> Result<(), InputError>;
}

/// Fixed set of per-button handler slots shared by input sources.
#[derive(Default)]
pub struct HandlerSlots {
    slots: [Option<PressHandler>; 3],
}

impl HandlerSlots {
    /// Store `handler`, returning `true` if it replaced an existing one.
    pub fn set(&mut self, button: Button, handler: PressHandler) -> bool {
        self.slots[button.index()].replace(handler).is_some()
    }

    /// Invoke the handler for `button`, if any.  Returns whether one ran.
    pub fn fire(&self, button: Button) -> bool {
        match &self.slots[button.index()] {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    pub fn is_bound(&self, button: Button) -> bool {
        self.slots[button.index()].is_some()
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock label shown on the thermostat's first display line.
pub trait Clock {
    /// Local time formatted as `MM/DD HH:MM`.
    fn now_label(&self) -> String;
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads system configuration.
///
/// Implementations MUST validate before returning; invalid values are
/// rejected with [`ConfigError::ValidationFailed`], not clamped.
pub trait ConfigPort {
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
