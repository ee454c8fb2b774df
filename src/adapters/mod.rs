//! Adapters: concrete implementations of the port traits for host runs.
//!
//! | Adapter        | Implements     | Connects to                    |
//! |----------------|----------------|--------------------------------|
//! | `config_file`  | ConfigPort     | JSON file (`serde_json`)       |
//! | `console`      | DisplayPort    | log output, 16x2 layout        |
//! | `serial`       | TelemetryPort  | tty / file / stdout            |
//! | `stdin_input`  | InputSource    | typed commands on stdin        |
//! | `time`         | Clock, DelayNs | `chrono` local time, sleep     |
//!
//! GPIO-backed drivers (PWM LEDs, debounced buttons) live in
//! [`crate::drivers`].

pub mod config_file;
pub mod console;
pub mod serial;
pub mod stdin_input;
pub mod time;
