//! Telemetry over a byte stream (UART device node, file, or stdout).
//!
//! Lines are written as-is, without a terminator, and flushed
//! immediately.

use std::fs::{File, OpenOptions};
use std::io::{self, Stdout, Write};
use std::path::Path;

use log::info;

use crate::app::ports::TelemetryPort;
use crate::error::TelemetryError;

pub struct SerialTelemetry<W> {
    out: W,
    sent: u64,
}

impl<W: Write> SerialTelemetry<W> {
    pub fn new(out: W) -> Self {
        Self { out, sent: 0 }
    }

    pub fn lines_sent(&self) -> u64 {
        self.sent
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl SerialTelemetry<File> {
    /// Open a tty or file for appending.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        info!("Telemetry -> {}", path.display());
        Ok(Self::new(file))
    }
}

impl SerialTelemetry<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TelemetryPort for SerialTelemetry<W> {
    fn emit(&mut self, line: &str) -> Result<(), TelemetryError> {
        self.out
            .write_all(line.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|_| TelemetryError::WriteFailed)?;
        self.sent += 1;
        info!("SERIAL | {}", line);
        Ok(())
    }
}
