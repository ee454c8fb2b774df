//! Character display rendered to the log.
//!
//! Mirrors a 16x2 HD44780: each line is cut to the column count, and a
//! frame is logged only when its content changes.

use log::{debug, info};

use crate::app::ports::DisplayPort;
use crate::error::DisplayError;

pub struct ConsoleDisplay {
    columns: usize,
    lines: [String; 2],
    frames: u64,
}

impl ConsoleDisplay {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            lines: [String::new(), String::new()],
            frames: 0,
        }
    }

    /// What the panel currently shows.
    pub fn lines(&self) -> (&str, &str) {
        (&self.lines[0], &self.lines[1])
    }

    /// Renders accepted so far, including unchanged ones.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn fit(&self, line: &str) -> String {
        line.chars().filter(|c| !c.is_control()).take(self.columns).collect()
    }
}

impl DisplayPort for ConsoleDisplay {
    fn render(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        let next = [self.fit(line1), self.fit(line2)];
        self.frames += 1;
        if next != self.lines {
            info!("LCD | {:<w$} | {:<w$} |", next[0], next[1], w = self.columns);
            self.lines = next;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.lines = [String::new(), String::new()];
        debug!("LCD | cleared");
        Ok(())
    }
}
