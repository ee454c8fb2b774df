//! Control policies: decide which state to enter and what to actuate.

pub mod morse;
pub mod schedule;
pub mod thermostat;
