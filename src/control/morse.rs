//! Morse signal encoder.
//!
//! Turns message text into the ordered list of hold states the Morse
//! engine must visit.  Every hold returns to `Off` on its own, so the
//! transmitter only ever drives `Off -> hold` edges.
//!
//! Per symbol: `Dot`/`Dash` then `DotDashPause`.  Per letter: the
//! symbols then `LetterPause`.  Per word: the letters then `WordPause`.
//! Characters with no Morse code are skipped silently.

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::app::ports::ActuatorPort;
use crate::error::InvalidTransition;
use crate::fsm::context::MorseContext;
use crate::fsm::morse::{MorseFsm, MorseState};

/// International Morse for A-Z then 0-9.
const LETTERS: [&str; 26] = [
    ".-", "-...", "-.-.", "-..", ".", "..-.", "--.", "....", "..", ".---", "-.-", ".-..", "--",
    "-.", "---", ".--.", "--.-", ".-.", "...", "-", "..-", "...-", ".--", "-..-", "-.--", "--..",
];

const DIGITS: [&str; 10] = [
    "-----", ".----", "..---", "...--", "....-", ".....", "-....", "--...", "---..", "----.",
];

/// Code for one character, case-insensitive.  Unknown characters map to
/// the empty string.
pub fn symbol_for(c: char) -> &'static str {
    let c = c.to_ascii_uppercase();
    match c {
        'A'..='Z' => LETTERS[(c as u8 - b'A') as usize],
        '0'..='9' => DIGITS[(c as u8 - b'0') as usize],
        _ => "",
    }
}

/// The full hold sequence for `message`.
pub fn encode(message: &str) -> Vec<MorseState> {
    let mut plan = Vec::new();
    for word in message.split_whitespace() {
        for c in word.chars() {
            for symbol in symbol_for(c).chars() {
                plan.push(if symbol == '.' {
                    MorseState::Dot
                } else {
                    MorseState::Dash
                });
                plan.push(MorseState::DotDashPause);
            }
            plan.push(MorseState::LetterPause);
        }
        plan.push(MorseState::WordPause);
    }
    plan
}

/// Drive every hold for `message` through the engine, blocking until the
/// last one has returned to `Off`.  Returns the number of holds driven.
pub fn transmit<A: ActuatorPort, D: DelayNs>(
    fsm: &mut MorseFsm<A, D>,
    ctx: &mut MorseContext<A, D>,
    message: &str,
) -> Result<usize, InvalidTransition> {
    let plan = encode(message);
    debug!("transmitting {:?} as {} holds", message, plan.len());
    for hold in &plan {
        fsm.transition(*hold, ctx)?;
    }
    Ok(plan.len())
}
