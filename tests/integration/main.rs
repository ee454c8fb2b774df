//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below exercises one control loop end to end against the
//! recording adapters in `mock_hw`.  No real hardware or sleeping is
//! required except where a test spawns a worker thread.

mod mock_hw;
mod morse_worker_tests;
mod thermostat_tests;
