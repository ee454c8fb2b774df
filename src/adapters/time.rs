//! Host time adapters.
//!
//! - [`LocalClock`]: wall-clock label for the display (`chrono`).
//! - [`StdDelay`]: blocking [`DelayNs`] backed by `std::thread::sleep`.

use std::time::Duration;

use chrono::Local;
use embedded_hal::delay::DelayNs;

use crate::app::ports::Clock;

/// Local time in the `MM/DD HH:MM` form the LCD shows.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

pub const CLOCK_FORMAT: &str = "%m/%d %H:%M";

impl Clock for LocalClock {
    fn now_label(&self) -> String {
        Local::now().format(CLOCK_FORMAT).to_string()
    }
}

/// Sleeps the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
