//! Fuzz target: Morse `encode` + `transmit`
//!
//! Feeds arbitrary (lossily decoded) text through the encoder and drives
//! the result through a real engine with no-op outputs.  The engine must
//! never reject an edge, must end in `Off`, and must take exactly two
//! transitions per hold.
//!
//! cargo fuzz run fuzz_morse_encode

#![no_main]

use embedded_hal::delay::DelayNs;
use holdctl::app::ports::ActuatorPort;
use holdctl::control::morse::{encode, transmit};
use holdctl::fsm::context::{MorseContext, MorseTiming};
use holdctl::fsm::morse::{self, MorseState};
use libfuzzer_sys::fuzz_target;

struct Nop;

impl ActuatorPort for Nop {
    fn on(&mut self) {}
    fn off(&mut self) {}
    fn pulse(&mut self) {}
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _: u32) {}
}

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let plan = encode(&text);
    assert!(plan.iter().all(|s| s.is_hold()), "plan contains Off");

    let mut fsm = morse::new_fsm();
    let mut ctx = MorseContext::new(Nop, Nop, NoDelay, MorseTiming::from_dot_us(1));
    let holds = transmit(&mut fsm, &mut ctx, &text).expect("encoder produced an undeclared edge");

    assert_eq!(holds, plan.len());
    assert_eq!(fsm.current_state(), MorseState::Off);
    assert_eq!(fsm.transition_count(), 2 * holds as u64);
});
