//! holdctl: timed hold-state control loops for a small LED/LCD board.
//!
//! Two applications share one table-driven state engine:
//!
//! - **Morse signaler**: dot/dash/pause hold states on a red and a blue
//!   indicator, sending a message the green button toggles.
//! - **Thermostat**: off/heat/cool modes pulsing the indicators against a
//!   sensed temperature and a set point the buttons adjust.
//!
//! Hardware is reached only through the port traits in [`app::ports`];
//! everything in this library runs on the host against test doubles.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod sensors;
