//! Inbound commands to the control loops.
//!
//! Every button press is translated into one [`AppCommand`] by a static
//! binding table, then executed by a
//! [`CommandTarget`](super::bridge::CommandTarget).  The simulation
//! console issues the same commands, so both paths share one code path.

use crate::app::ports::Button;

/// Actions the outside world can request of a running control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Swap the Morse message between its primary and alternate text.
    ToggleMessage,

    /// Step the thermostat mode off -> heat -> cool -> off.
    CycleMode,

    /// Add the given number of degrees to the thermostat set point.
    AdjustSetPoint(i32),
}

/// Which command each physical button issues.
pub type Bindings = &'static [(Button, AppCommand)];

pub const MORSE_BINDINGS: Bindings = &[(Button::Green, AppCommand::ToggleMessage)];

pub const THERMOSTAT_BINDINGS: Bindings = &[
    (Button::Green, AppCommand::CycleMode),
    (Button::Red, AppCommand::AdjustSetPoint(1)),
    (Button::Blue, AppCommand::AdjustSetPoint(-1)),
];

/// Command bound to `button`, if any.
pub fn lookup(bindings: Bindings, button: Button) -> Option<AppCommand> {
    bindings
        .iter()
        .find(|(b, _)| *b == button)
        .map(|(_, cmd)| *cmd)
}
