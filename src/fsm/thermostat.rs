//! Thermostat mode states and table builder.
//!
//! ```text
//!   OFF ──[cycle]──▶ HEAT ──[cycle]──▶ COOL ──[cycle]──▶ OFF
//! ```
//!
//! Entering HEAT or COOL starts its indicator pulsing; leaving turns it
//! off; entering OFF turns both off.  The finer-grained on/pulse choice
//! is made afterwards by the threshold controller.

use log::info;

use super::context::{Level, Lights};
use super::{Fsm, StateDescriptor, StateId, StateTable};
use crate::app::ports::ActuatorPort;

/// Number of thermostat modes (table rows).
pub const MODE_COUNT: usize = 3;

/// Thermostat operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    Off = 0,
    Heat = 1,
    Cool = 2,
}

impl StateId for Mode {
    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Heat => "heat",
            Self::Cool => "cool",
        }
    }
}

impl Mode {
    pub const ALL: [Mode; MODE_COUNT] = [Self::Off, Self::Heat, Self::Cool];

    /// The mode one cycle step ahead (wrapping).
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::Heat,
            Self::Heat => Self::Cool,
            Self::Cool => Self::Off,
        }
    }

    /// Upper-case label for the display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Heat => "HEAT",
            Self::Cool => "COOL",
        }
    }
}

/// Thermostat engine over a concrete output pair.
pub type ThermostatFsm<A> = Fsm<Mode, Lights<A>, MODE_COUNT>;

static MODE_TRANSITIONS: [(Mode, Mode); 3] = [
    (Mode::Off, Mode::Heat),
    (Mode::Heat, Mode::Cool),
    (Mode::Cool, Mode::Off),
];

/// Build the static state table.  Called once at startup.
pub fn build_state_table<A: ActuatorPort>() -> StateTable<Mode, Lights<A>, MODE_COUNT> {
    StateTable {
        states: [
            StateDescriptor {
                id: Mode::Off,
                on_enter: Some(off_enter::<A>),
                on_exit: None,
            },
            StateDescriptor {
                id: Mode::Heat,
                on_enter: Some(heat_enter::<A>),
                on_exit: Some(heat_exit::<A>),
            },
            StateDescriptor {
                id: Mode::Cool,
                on_enter: Some(cool_enter::<A>),
                on_exit: Some(cool_exit::<A>),
            },
        ],
        transitions: &MODE_TRANSITIONS,
    }
}

/// Construct an engine resting in `Off`.
pub fn new_fsm<A: ActuatorPort>() -> ThermostatFsm<A> {
    Fsm::new(build_state_table(), Mode::Off)
}

fn off_enter<A: ActuatorPort>(lights: &mut Lights<A>) -> Option<Mode> {
    lights.all_off();
    info!("* Changing state to OFF");
    None
}

fn heat_enter<A: ActuatorPort>(lights: &mut Lights<A>) -> Option<Mode> {
    lights.set_red(Level::Pulse);
    info!("* Changing state to HEAT");
    None
}

fn heat_exit<A: ActuatorPort>(lights: &mut Lights<A>) {
    lights.set_red(Level::Off);
}

fn cool_enter<A: ActuatorPort>(lights: &mut Lights<A>) -> Option<Mode> {
    lights.set_blue(Level::Pulse);
    info!("* Changing state to COOL");
    None
}

fn cool_exit<A: ActuatorPort>(lights: &mut Lights<A>) {
    lights.set_blue(Level::Off);
}
