//! Application core: ports, shared control state, workers and the
//! button bridge.
//!
//! Everything here talks to hardware only through the **port traits**
//! in [`ports`], so workers and bridges run unchanged against recording
//! test doubles.

pub mod bridge;
pub mod commands;
pub mod ports;
pub mod shared;
pub mod worker;
