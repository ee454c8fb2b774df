//! System configuration parameters
//!
//! All tunable parameters for both control loops.  Values come from an
//! optional JSON file (see [`JsonFileConfig`](crate::adapters::config_file::JsonFileConfig))
//! layered over these defaults, then CLI overrides.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::app::shared::MAX_MESSAGE_LEN;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub morse: MorseConfig,
    pub thermostat: ThermostatConfig,

    // --- Process ---
    /// Grace period granted to the worker after a stop request (milliseconds)
    pub shutdown_grace_ms: u32,
    /// Interval between idle heartbeat log lines from the main thread (seconds)
    pub heartbeat_interval_secs: u32,
    /// Character columns on the display
    pub display_columns: usize,
}

/// Morse signaler parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorseConfig {
    /// Dot hold (milliseconds); every other hold derives from it
    pub dot_ms: u32,
    /// Message sent at startup
    pub primary_message: String,
    /// Message the green button toggles to
    pub alternate_message: String,
}

/// Thermostat parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermostatConfig {
    /// Initial set point (degrees Fahrenheit)
    pub initial_set_point_f: i32,
    /// Worker tick period (milliseconds)
    pub tick_ms: u32,
    /// Ticks each display view stays up before alternating
    pub view_ticks: u32,
    /// Ticks between telemetry lines
    pub telemetry_interval_ticks: u32,
    /// Telemetry byte stream (e.g. `/dev/ttyS0`); stdout when unset
    pub serial_path: Option<String>,
    /// Starting temperature of the simulated sensor (degrees Celsius)
    pub sim_temperature_c: f32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            morse: MorseConfig::default(),
            thermostat: ThermostatConfig::default(),
            shutdown_grace_ms: 1000,
            heartbeat_interval_secs: 20,
            display_columns: crate::pins::LCD_COLUMNS,
        }
    }
}

impl Default for MorseConfig {
    fn default() -> Self {
        Self {
            dot_ms: 500,
            primary_message: "SOS".into(),
            alternate_message: "OK".into(),
        }
    }
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            initial_set_point_f: 72,
            tick_ms: 1000,               // 1 Hz
            view_ticks: 5,               // 5 s temperature, 5 s mode
            telemetry_interval_ticks: 30, // every 30 s
            serial_path: None,
            sim_temperature_c: 22.0,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Rejects rather than clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.morse.dot_ms == 0 {
            return Err(ConfigError::ValidationFailed("morse.dot_ms must be > 0"));
        }
        // word gap = 6 dots, in microseconds, must fit a u32 delay
        if u64::from(self.morse.dot_ms) * 6 * 1000 > u64::from(u32::MAX) {
            return Err(ConfigError::ValidationFailed("morse.dot_ms too large"));
        }
        if self.morse.primary_message.len() > MAX_MESSAGE_LEN
            || self.morse.alternate_message.len() > MAX_MESSAGE_LEN
        {
            return Err(ConfigError::ValidationFailed("morse message too long"));
        }
        let t = &self.thermostat;
        if t.tick_ms == 0 {
            return Err(ConfigError::ValidationFailed("thermostat.tick_ms must be > 0"));
        }
        if t.view_ticks == 0 {
            return Err(ConfigError::ValidationFailed("thermostat.view_ticks must be > 0"));
        }
        if t.telemetry_interval_ticks == 0 {
            return Err(ConfigError::ValidationFailed(
                "thermostat.telemetry_interval_ticks must be > 0",
            ));
        }
        if !t.sim_temperature_c.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "thermostat.sim_temperature_c must be finite",
            ));
        }
        if self.display_columns == 0 {
            return Err(ConfigError::ValidationFailed("display_columns must be > 0"));
        }
        Ok(())
    }
}
