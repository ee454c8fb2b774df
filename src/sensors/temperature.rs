//! Simulated temperature sensor.
//!
//! Stands in for the board's I2C temperature/humidity sensor on the
//! host.  The reading lives in an atomic (bit pattern of an `f32`) so the
//! console thread can inject a new temperature while the worker reads.

use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::app::ports::SensorPort;
use crate::error::SensorError;

/// Plausible range of the real part, degrees Celsius.
pub const MIN_CELSIUS: f32 = -40.0;
pub const MAX_CELSIUS: f32 = 125.0;

/// Writer side of a [`SimTemperatureSensor`].
#[derive(Clone)]
pub struct SimTemperatureHandle(Arc<AtomicU32>);

impl SimTemperatureHandle {
    pub fn set_celsius(&self, c: f32) {
        self.0.store(c.to_bits(), Ordering::Relaxed);
    }

    pub fn celsius(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }
}

pub struct SimTemperatureSensor {
    celsius: Arc<AtomicU32>,
}

impl SimTemperatureSensor {
    pub fn new(initial_c: f32) -> Self {
        Self {
            celsius: Arc::new(AtomicU32::new(initial_c.to_bits())),
        }
    }

    pub fn handle(&self) -> SimTemperatureHandle {
        SimTemperatureHandle(Arc::clone(&self.celsius))
    }
}

impl SensorPort for SimTemperatureSensor {
    fn read(&mut self) -> Result<f32, SensorError> {
        let c = f32::from_bits(self.celsius.load(Ordering::Relaxed));
        if c.is_finite() && (MIN_CELSIUS..=MAX_CELSIUS).contains(&c) {
            Ok(c)
        } else {
            Err(SensorError::OutOfRange)
        }
    }
}
