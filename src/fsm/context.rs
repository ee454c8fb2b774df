//! Contexts threaded through the FSM handlers.
//!
//! Each machine gets exactly the capabilities its enter/exit actions
//! need, passed in at construction rather than reached through globals:
//!
//! - [`MorseContext`]: two indicator outputs, a blocking delay, and the
//!   hold timing derived from the dot length.
//! - [`Lights`]: the thermostat's red (heat) and blue (cool) outputs.

use embedded_hal::delay::DelayNs;

use crate::app::ports::ActuatorPort;

// ---------------------------------------------------------------------------
// Morse timing
// ---------------------------------------------------------------------------

/// Hold durations for every Morse state, in microseconds.
///
/// Built from a single dot length so the ratios stay fixed:
/// dash = 3 dot, inter-symbol gap = 0.5 dot, inter-letter gap = 1.5 dot,
/// inter-word gap = 6 dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorseTiming {
    pub dot_us: u32,
    pub dash_us: u32,
    pub symbol_gap_us: u32,
    pub letter_gap_us: u32,
    pub word_gap_us: u32,
}

impl MorseTiming {
    pub fn from_dot_ms(dot_ms: u32) -> Self {
        Self::from_dot_us(dot_ms.saturating_mul(1000))
    }

    pub fn from_dot_us(dot_us: u32) -> Self {
        Self {
            dot_us,
            dash_us: dot_us.saturating_mul(3),
            symbol_gap_us: dot_us / 2,
            letter_gap_us: dot_us.saturating_mul(3) / 2,
            word_gap_us: dot_us.saturating_mul(6),
        }
    }
}

impl Default for MorseTiming {
    fn default() -> Self {
        Self::from_dot_ms(500)
    }
}

/// Everything the Morse hold states touch.
pub struct MorseContext<A, D> {
    /// Dot indicator.
    pub red: A,
    /// Dash indicator.
    pub blue: A,
    /// Blocking delay used for every hold.
    pub delay: D,
    pub timing: MorseTiming,
}

impl<A: ActuatorPort, D: DelayNs> MorseContext<A, D> {
    pub fn new(red: A, blue: A, delay: D, timing: MorseTiming) -> Self {
        Self {
            red,
            blue,
            delay,
            timing,
        }
    }

    /// Force both indicators off (shutdown path).
    pub fn all_off(&mut self) {
        self.red.off();
        self.blue.off();
    }
}

// ---------------------------------------------------------------------------
// Thermostat lights
// ---------------------------------------------------------------------------

/// Drive level for one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Off,
    /// Steady on: set point satisfied.
    On,
    /// Soft periodic fade: actively heating or cooling.
    Pulse,
}

impl Level {
    /// Issue the matching command on `out`.
    pub fn apply(self, out: &mut impl ActuatorPort) {
        match self {
            Self::Off => out.off(),
            Self::On => out.on(),
            Self::Pulse => out.pulse(),
        }
    }
}

/// Red (heat) and blue (cool) indicator pair, remembering the last level
/// commanded on each.
pub struct Lights<A> {
    red: A,
    blue: A,
    red_level: Level,
    blue_level: Level,
}

impl<A: ActuatorPort> Lights<A> {
    pub fn new(red: A, blue: A) -> Self {
        Self {
            red,
            blue,
            red_level: Level::Off,
            blue_level: Level::Off,
        }
    }

    pub fn set_red(&mut self, level: Level) {
        level.apply(&mut self.red);
        self.red_level = level;
    }

    pub fn set_blue(&mut self, level: Level) {
        level.apply(&mut self.blue);
        self.blue_level = level;
    }

    pub fn all_off(&mut self) {
        self.set_red(Level::Off);
        self.set_blue(Level::Off);
    }

    /// Last commanded `(red, blue)` levels.
    pub fn levels(&self) -> (Level, Level) {
        (self.red_level, self.blue_level)
    }

    pub fn red(&self) -> &A {
        &self.red
    }

    pub fn blue(&self) -> &A {
        &self.blue
    }
}
