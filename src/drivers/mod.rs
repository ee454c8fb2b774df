//! Output and input drivers, and the worker thread helper.

pub mod button;
pub mod led;
pub mod task;
