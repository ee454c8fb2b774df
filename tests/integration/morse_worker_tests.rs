//! Morse worker against recording lights, delay and display.

use std::sync::Arc;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

use holdctl::adapters::time::StdDelay;
use holdctl::app::bridge::EventBridge;
use holdctl::app::commands::MORSE_BINDINGS;
use holdctl::app::ports::Button;
use holdctl::app::shared::{ActiveMessage, StopFlag};
use holdctl::app::worker::MorseWorker;
use holdctl::drivers::led::SimLed;
use holdctl::fsm::context::{Level, MorseContext, MorseTiming};
use holdctl::fsm::morse::MorseState;

use crate::mock_hw::{Event, ManualInput, MockDelay, MockDisplay, MockLed, Timeline};

const DOT: u32 = 100;

type Worker = MorseWorker<MockLed, MockDelay, MockDisplay>;

fn worker_with_stop(
    primary: &str,
    delay: MockDelay,
    timeline: &Timeline,
    stop: Arc<StopFlag>,
) -> (Worker, Arc<ActiveMessage>, MockDisplay) {
    let message = Arc::new(ActiveMessage::new(primary, "OK").unwrap());
    let display = MockDisplay::default();
    let ctx = MorseContext::new(
        MockLed::new("red", timeline),
        MockLed::new("blue", timeline),
        delay,
        MorseTiming::from_dot_us(DOT),
    );
    let w = MorseWorker::new(ctx, display.clone(), message.clone(), stop).unwrap();
    (w, message, display)
}

fn worker(
    primary: &str,
    delay: MockDelay,
    timeline: &Timeline,
) -> (Worker, Arc<ActiveMessage>, MockDisplay) {
    worker_with_stop(primary, delay, timeline, Arc::new(StopFlag::new()))
}

fn letter(symbols: &[u32]) -> Vec<u32> {
    let mut v = Vec::new();
    for s in symbols {
        v.push(*s);
        v.push(DOT / 2);
    }
    v.push(DOT * 3 / 2);
    v
}

#[test]
fn sos_holds_in_order() {
    let tl = Timeline::default();
    let (mut w, _, display) = worker("SOS", MockDelay::new(&tl), &tl);

    let holds = w.send_once().unwrap();

    let s = letter(&[DOT, DOT, DOT]);
    let o = letter(&[DOT * 3, DOT * 3, DOT * 3]);
    let mut expected = Vec::new();
    expected.extend(&s);
    expected.extend(&o);
    expected.extend(&s);
    expected.push(DOT * 6);

    assert_eq!(tl.holds(), expected);
    assert_eq!(holds, expected.len());
    assert_eq!(tl.count(Event::On("red")), 6);
    assert_eq!(tl.count(Event::On("blue")), 3);
    assert_eq!(display.frames(), [("Sending:".to_owned(), "SOS".to_owned())]);
    assert_eq!(w.current_state(), MorseState::Off);
}

#[test]
fn dot_light_is_on_only_during_its_hold() {
    let tl = Timeline::default();
    let (mut w, _, _) = worker("E", MockDelay::new(&tl), &tl);
    w.send_once().unwrap();

    let events = tl.events();
    assert_eq!(
        &events[..4],
        [Event::On("red"), Event::Hold(DOT), Event::Off("red"), Event::Off("red")]
    );
}

#[test]
fn toggle_applies_at_next_message() {
    let tl = Timeline::default();
    let (mut w, message, display) = worker("SOS", MockDelay::new(&tl), &tl);
    let mut input = ManualInput::default();
    EventBridge::new(message.clone(), MORSE_BINDINGS).attach(&mut input);

    w.send_once().unwrap();
    assert!(input.press(Button::Green));
    w.send_once().unwrap();
    assert!(input.press(Button::Green));
    w.send_once().unwrap();

    assert_eq!(display.line2s(), ["SOS", "OK", "SOS"]);
    assert_eq!(w.messages_sent(), 3);
}

/// Recording delay that toggles the active message during one hold.
struct TogglingDelay {
    inner: MockDelay,
    message: Arc<ActiveMessage>,
    toggle_on: usize,
    holds: usize,
}

impl TogglingDelay {
    fn count_hold(&mut self) {
        self.holds += 1;
        if self.holds == self.toggle_on {
            self.message.toggle();
        }
    }
}

impl DelayNs for TogglingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.count_hold();
        self.inner.delay_ns(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.count_hold();
        self.inner.delay_us(us);
    }
}

#[test]
fn toggle_during_a_hold_waits_for_message_boundary() {
    let tl = Timeline::default();
    let message = Arc::new(ActiveMessage::new("SOS", "OK").unwrap());
    let display = MockDisplay::default();
    let delay = TogglingDelay {
        inner: MockDelay::new(&tl),
        message: message.clone(),
        toggle_on: 2,
        holds: 0,
    };
    let ctx = MorseContext::new(
        MockLed::new("red", &tl),
        MockLed::new("blue", &tl),
        delay,
        MorseTiming::from_dot_us(DOT),
    );
    let stop = Arc::new(StopFlag::new());
    let mut w = MorseWorker::new(ctx, display.clone(), message.clone(), stop).unwrap();

    // the toggle lands inside the second hold; SOS still completes
    assert_eq!(w.send_once().unwrap(), 22);
    assert_eq!(message.current().as_str(), "OK");
    assert_eq!(tl.count(Event::On("red")), 6);
    assert_eq!(tl.count(Event::On("blue")), 3);

    // O (3 dashes) + K (dash dot dash) + word gap
    assert_eq!(w.send_once().unwrap(), 15);
    assert_eq!(display.line2s(), ["SOS", "OK"]);
}

#[test]
fn unencodable_message_idles_one_word_gap() {
    let tl = Timeline::default();
    let (mut w, message, _) = worker("", MockDelay::new(&tl), &tl);

    assert_eq!(w.send_once().unwrap(), 1);
    assert_eq!(tl.holds(), [DOT * 6]);

    message.set("???").unwrap();
    tl.clear();
    w.send_once().unwrap();
    // three empty letters, then the word gap
    assert_eq!(tl.holds(), [DOT * 3 / 2, DOT * 3 / 2, DOT * 3 / 2, DOT * 6]);
}

#[test]
fn display_failure_does_not_stop_sending() {
    let tl = Timeline::default();
    let message = Arc::new(ActiveMessage::new("E", "OK").unwrap());
    let ctx = MorseContext::new(
        MockLed::new("red", &tl),
        MockLed::new("blue", &tl),
        MockDelay::new(&tl),
        MorseTiming::from_dot_us(DOT),
    );
    let stop = Arc::new(StopFlag::new());
    let mut w = MorseWorker::new(ctx, MockDisplay::failing(), message, stop).unwrap();
    assert!(w.send_once().is_ok());
    assert_eq!(tl.count(Event::On("red")), 1);
}

#[test]
fn run_stops_at_message_boundary_and_shuts_down() {
    let tl = Timeline::default();
    let stop = Arc::new(StopFlag::new());
    // stop is raised during the first hold; the message still completes
    let delay = MockDelay::stopping_after(&tl, 1, &stop);
    let (w, _, display) = worker_with_stop("SOS", delay, &tl, stop.clone());

    w.run().unwrap();

    assert_eq!(tl.holds().len(), 22);
    assert_eq!(display.frames().len(), 1);
    assert!(display.cleared());
    let events = tl.events();
    let tail = &events[events.len() - 2..];
    assert_eq!(tail, [Event::Off("red"), Event::Off("blue")]);
}

#[test]
fn spawned_worker_exits_on_stop() {
    let message = Arc::new(ActiveMessage::new("E", "T").unwrap());
    let stop = Arc::new(StopFlag::new());
    let red = SimLed::new("red", 18);
    let blue = SimLed::new("blue", 23);
    let ctx = MorseContext::new(red.clone(), blue.clone(), StdDelay, MorseTiming::from_dot_us(200));
    let handle = MorseWorker::new(ctx, MockDisplay::default(), message, stop.clone())
        .unwrap()
        .spawn()
        .unwrap();

    std::thread::sleep(Duration::from_millis(20));
    stop.request();
    for _ in 0..200 {
        if handle.is_finished() {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(handle.is_finished());
    assert!(handle.join().unwrap().is_ok());
    assert_eq!(red.level(), Level::Off);
    assert_eq!(blue.level(), Level::Off);
}
