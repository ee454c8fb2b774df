//! Morse signaler states and table builder.
//!
//! Every non-`Off` state is a hold: its enter action performs the output
//! effect, blocks for the hold duration, and returns `Some(Off)`, so the
//! engine can never rest anywhere but `Off` between holds.
//!
//! ```text
//!            ┌──▶ DOT ────────────┐
//!            ├──▶ DASH ───────────┤
//!   OFF ─────┼──▶ DOT_DASH_PAUSE ─┼──▶ OFF
//!            ├──▶ LETTER_PAUSE ───┤
//!            └──▶ WORD_PAUSE ─────┘
//! ```

use embedded_hal::delay::DelayNs;
use log::trace;

use super::context::MorseContext;
use super::{Fsm, StateDescriptor, StateId, StateTable};
use crate::app::ports::ActuatorPort;

/// Number of Morse states (table rows).
pub const MORSE_STATE_COUNT: usize = 6;

/// Morse signaler states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MorseState {
    Off = 0,
    Dot = 1,
    Dash = 2,
    DotDashPause = 3,
    LetterPause = 4,
    WordPause = 5,
}

impl StateId for MorseState {
    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Dot => "dot",
            Self::Dash => "dash",
            Self::DotDashPause => "dotDashPause",
            Self::LetterPause => "letterPause",
            Self::WordPause => "wordPause",
        }
    }
}

impl MorseState {
    pub const ALL: [MorseState; MORSE_STATE_COUNT] = [
        Self::Off,
        Self::Dot,
        Self::Dash,
        Self::DotDashPause,
        Self::LetterPause,
        Self::WordPause,
    ];

    /// `true` for every state that returns to `Off` on its own.
    pub fn is_hold(self) -> bool {
        self != Self::Off
    }
}

/// Morse engine over a concrete context.
pub type MorseFsm<A, D> = Fsm<MorseState, MorseContext<A, D>, MORSE_STATE_COUNT>;

/// Every hold is entered from `Off` and returns to `Off`.
static MORSE_TRANSITIONS: [(MorseState, MorseState); 10] = [
    (MorseState::Off, MorseState::Dot),
    (MorseState::Dot, MorseState::Off),
    (MorseState::Off, MorseState::Dash),
    (MorseState::Dash, MorseState::Off),
    (MorseState::Off, MorseState::DotDashPause),
    (MorseState::DotDashPause, MorseState::Off),
    (MorseState::Off, MorseState::LetterPause),
    (MorseState::LetterPause, MorseState::Off),
    (MorseState::Off, MorseState::WordPause),
    (MorseState::WordPause, MorseState::Off),
];

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table<A: ActuatorPort, D: DelayNs>()
-> StateTable<MorseState, MorseContext<A, D>, MORSE_STATE_COUNT> {
    StateTable {
        states: [
            StateDescriptor {
                id: MorseState::Off,
                on_enter: None,
                on_exit: None,
            },
            StateDescriptor {
                id: MorseState::Dot,
                on_enter: Some(dot_enter::<A, D>),
                on_exit: Some(dot_exit::<A, D>),
            },
            StateDescriptor {
                id: MorseState::Dash,
                on_enter: Some(dash_enter::<A, D>),
                on_exit: Some(dash_exit::<A, D>),
            },
            StateDescriptor {
                id: MorseState::DotDashPause,
                on_enter: Some(symbol_gap_enter::<A, D>),
                on_exit: None,
            },
            StateDescriptor {
                id: MorseState::LetterPause,
                on_enter: Some(letter_gap_enter::<A, D>),
                on_exit: None,
            },
            StateDescriptor {
                id: MorseState::WordPause,
                on_enter: Some(word_gap_enter::<A, D>),
                on_exit: None,
            },
        ],
        transitions: &MORSE_TRANSITIONS,
    }
}

/// Construct an engine resting in `Off`.
pub fn new_fsm<A: ActuatorPort, D: DelayNs>() -> MorseFsm<A, D> {
    Fsm::new(build_state_table(), MorseState::Off)
}

// ═══════════════════════════════════════════════════════════════════════════
//  Symbol holds
// ═══════════════════════════════════════════════════════════════════════════

fn dot_enter<A: ActuatorPort, D: DelayNs>(ctx: &mut MorseContext<A, D>) -> Option<MorseState> {
    ctx.red.on();
    ctx.delay.delay_us(ctx.timing.dot_us);
    ctx.red.off();
    trace!("* dot");
    Some(MorseState::Off)
}

fn dot_exit<A: ActuatorPort, D: DelayNs>(ctx: &mut MorseContext<A, D>) {
    ctx.red.off();
}

fn dash_enter<A: ActuatorPort, D: DelayNs>(ctx: &mut MorseContext<A, D>) -> Option<MorseState> {
    ctx.blue.on();
    ctx.delay.delay_us(ctx.timing.dash_us);
    ctx.blue.off();
    trace!("* dash");
    Some(MorseState::Off)
}

fn dash_exit<A: ActuatorPort, D: DelayNs>(ctx: &mut MorseContext<A, D>) {
    ctx.blue.off();
}

// ═══════════════════════════════════════════════════════════════════════════
//  Gap holds
// ═══════════════════════════════════════════════════════════════════════════

fn symbol_gap_enter<A: ActuatorPort, D: DelayNs>(
    ctx: &mut MorseContext<A, D>,
) -> Option<MorseState> {
    ctx.delay.delay_us(ctx.timing.symbol_gap_us);
    Some(MorseState::Off)
}

fn letter_gap_enter<A: ActuatorPort, D: DelayNs>(
    ctx: &mut MorseContext<A, D>,
) -> Option<MorseState> {
    ctx.delay.delay_us(ctx.timing.letter_gap_us);
    trace!("* letter gap");
    Some(MorseState::Off)
}

fn word_gap_enter<A: ActuatorPort, D: DelayNs>(
    ctx: &mut MorseContext<A, D>,
) -> Option<MorseState> {
    ctx.delay.delay_us(ctx.timing.word_gap_us);
    trace!("* word gap");
    Some(MorseState::Off)
}
