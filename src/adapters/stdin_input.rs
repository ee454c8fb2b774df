//! Simulation input source: type commands on stdin instead of pressing
//! buttons.
//!
//! | Line        | Effect                                   |
//! |-------------|------------------------------------------|
//! | `g`         | green button press                       |
//! | `r`         | red button press                         |
//! | `b`         | blue button press                        |
//! | `t <C>`     | set the simulated temperature (Celsius)  |
//! | `q`         | request shutdown                         |

use std::io::BufRead;
use std::sync::Arc;

use log::{info, warn};

use crate::app::ports::{Button, HandlerSlots, InputSource, PressHandler};
use crate::app::shared::StopFlag;
use crate::drivers::task::spawn_named;
use crate::error::InputError;
use crate::sensors::temperature::SimTemperatureHandle;

/// One parsed console line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleCommand {
    Press(Button),
    SetTemperature(f32),
    Quit,
}

/// Parse a console line.  Blank or unrecognised lines give `None`.
pub fn parse_line(line: &str) -> Option<ConsoleCommand> {
    let mut words = line.split_whitespace();
    let cmd = words.next()?.to_ascii_lowercase();
    match cmd.as_str() {
        "g" | "green" => Some(ConsoleCommand::Press(Button::Green)),
        "r" | "red" => Some(ConsoleCommand::Press(Button::Red)),
        "b" | "blue" => Some(ConsoleCommand::Press(Button::Blue)),
        "t" | "temp" => words
            .next()?
            .parse::<f32>()
            .ok()
            .filter(|c| c.is_finite())
            .map(ConsoleCommand::SetTemperature),
        "q" | "quit" => Some(ConsoleCommand::Quit),
        _ => None,
    }
}

/// Reads commands from a line source and fires button handlers.
pub struct StdinInput {
    slots: Option<HandlerSlots>,
    temperature: Option<SimTemperatureHandle>,
    stop: Arc<StopFlag>,
}

impl StdinInput {
    pub fn new(temperature: Option<SimTemperatureHandle>, stop: Arc<StopFlag>) -> Self {
        Self {
            slots: Some(HandlerSlots::default()),
            temperature,
            stop,
        }
    }

    /// Consume `reader` line by line until EOF, `q`, or a stop request.
    /// Returns the number of commands executed.
    pub fn pump<R: BufRead>(
        reader: R,
        slots: &HandlerSlots,
        temperature: Option<&SimTemperatureHandle>,
        stop: &StopFlag,
    ) -> usize {
        let mut executed = 0;
        for line in reader.lines() {
            if stop.is_requested() {
                break;
            }
            let Ok(line) = line else { break };
            match parse_line(&line) {
                Some(ConsoleCommand::Press(b)) => {
                    if !slots.fire(b) {
                        info!("{:?} button has no action", b);
                    }
                }
                Some(ConsoleCommand::SetTemperature(c)) => match temperature {
                    Some(h) => {
                        h.set_celsius(c);
                        info!("Simulated temperature now {:.1}C", c);
                    }
                    None => warn!("no simulated sensor in this mode"),
                },
                Some(ConsoleCommand::Quit) => {
                    stop.request();
                    executed += 1;
                    break;
                }
                None => {
                    if !line.trim().is_empty() {
                        warn!("unknown command {:?} (g/r/b, t <C>, q)", line.trim());
                    }
                    continue;
                }
            }
            executed += 1;
        }
        executed
    }
}

impl InputSource for StdinInput {
    fn on_press(&mut self, button: Button, handler: PressHandler) {
        match self.slots.as_mut() {
            Some(slots) => {
                if slots.set(button, handler) {
                    warn!("{:?} button handler replaced", button);
                }
            }
            None => warn!("{:?} handler registered after start; ignored", button),
        }
    }

    fn start(&mut self) -> Result<(), InputError> {
        let slots = self.slots.take().ok_or(InputError::AlreadyStarted)?;
        let temperature = self.temperature.clone();
        let stop = Arc::clone(&self.stop);
        info!("Console input: g/r/b press a button, t <C> sets temperature, q quits");
        spawn_named("stdin-input", 16, move || {
            let stdin = std::io::stdin();
            Self::pump(stdin.lock(), &slots, temperature.as_ref(), &stop);
        })
        .map(|_| ())
        .map_err(|_| InputError::SpawnFailed)
    }
}
