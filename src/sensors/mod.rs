//! Sensor drivers behind [`SensorPort`](crate::app::ports::SensorPort).

pub mod temperature;
