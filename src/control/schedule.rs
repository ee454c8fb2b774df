//! Tick cadence for the thermostat worker.
//!
//! The worker ticks at a fixed period.  Ticks are grouped into windows
//! of `2 * view_ticks`: the first half shows the temperature, the second
//! half the mode and set point, and the last tick of the window
//! recomputes actuation.  Telemetry fires on every
//! `telemetry_interval_ticks`-th tick.

use crate::config::ThermostatConfig;

/// What the second display line shows this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Temperature,
    Status,
}

/// Work due on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPlan {
    pub view: View,
    pub recompute: bool,
    pub telemetry: bool,
}

#[derive(Debug, Clone)]
pub struct TickSchedule {
    view_ticks: u32,
    telemetry_every: u32,
    /// Ticks completed so far.
    tick: u64,
}

impl TickSchedule {
    /// Both periods are clamped to at least one tick.
    pub fn new(view_ticks: u32, telemetry_every: u32) -> Self {
        Self {
            view_ticks: view_ticks.max(1),
            telemetry_every: telemetry_every.max(1),
            tick: 0,
        }
    }

    pub fn from_config(cfg: &ThermostatConfig) -> Self {
        Self::new(cfg.view_ticks, cfg.telemetry_interval_ticks)
    }

    /// Plan for the next tick and advance.
    pub fn next_tick(&mut self) -> TickPlan {
        self.tick += 1;
        let window = u64::from(self.view_ticks) * 2;
        // 1-based position inside the window
        let pos = (self.tick - 1) % window + 1;
        TickPlan {
            view: if pos <= u64::from(self.view_ticks) {
                View::Temperature
            } else {
                View::Status
            },
            recompute: pos == window,
            telemetry: self.tick % u64::from(self.telemetry_every) == 0,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::from_config(&ThermostatConfig::default())
    }
}
