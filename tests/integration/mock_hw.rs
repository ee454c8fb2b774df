//! Mock hardware for integration tests.
//!
//! Lights and delays record into one shared [`Timeline`] so tests can
//! assert on the exact interleaving of output commands and holds without
//! sleeping or touching GPIO.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use holdctl::app::ports::{
    ActuatorPort, Button, Clock, DisplayPort, HandlerSlots, InputSource, PressHandler, SensorPort,
    TelemetryPort,
};
use holdctl::app::shared::StopFlag;
use holdctl::error::{DisplayError, InputError, SensorError, TelemetryError};

// ── Timeline ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    On(&'static str),
    Off(&'static str),
    Pulse(&'static str),
    /// Hold in microseconds.
    Hold(u32),
}

#[derive(Clone, Default)]
pub struct Timeline(Arc<Mutex<Vec<Event>>>);

#[allow(dead_code)]
impl Timeline {
    pub fn push(&self, e: Event) {
        self.0.lock().unwrap().push(e);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn holds(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Hold(us) => Some(us),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, e: Event) -> usize {
        self.events().iter().filter(|x| **x == e).count()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

// ── Lights ────────────────────────────────────────────────────

pub struct MockLed {
    name: &'static str,
    timeline: Timeline,
}

impl MockLed {
    pub fn new(name: &'static str, timeline: &Timeline) -> Self {
        Self {
            name,
            timeline: timeline.clone(),
        }
    }
}

impl ActuatorPort for MockLed {
    fn on(&mut self) {
        self.timeline.push(Event::On(self.name));
    }
    fn off(&mut self) {
        self.timeline.push(Event::Off(self.name));
    }
    fn pulse(&mut self) {
        self.timeline.push(Event::Pulse(self.name));
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Records every hold; optionally raises a stop flag after a number of
/// holds so `run()` loops terminate deterministically.
pub struct MockDelay {
    timeline: Timeline,
    stop_after: Option<(usize, Arc<StopFlag>)>,
    seen: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockDelay {
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
            stop_after: None,
            seen: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn stopping_after(timeline: &Timeline, holds: usize, stop: &Arc<StopFlag>) -> Self {
        Self {
            stop_after: Some((holds, Arc::clone(stop))),
            ..Self::new(timeline)
        }
    }
}

impl MockDelay {
    fn record(&mut self, us: u32) {
        self.timeline.push(Event::Hold(us));
        let n = self.seen.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((limit, stop)) = &self.stop_after {
            if n >= *limit {
                stop.request();
            }
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.record(ns / 1000);
    }

    fn delay_us(&mut self, us: u32) {
        self.record(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(ms.saturating_mul(1000));
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockDisplay {
    pub frames: Arc<Mutex<Vec<(String, String)>>>,
    pub clears: Arc<AtomicUsize>,
    pub failing: bool,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn frames(&self) -> Vec<(String, String)> {
        self.frames.lock().unwrap().clone()
    }

    pub fn line2s(&self) -> Vec<String> {
        self.frames().into_iter().map(|(_, l2)| l2).collect()
    }

    pub fn cleared(&self) -> bool {
        self.clears.load(Ordering::SeqCst) > 0
    }
}

impl DisplayPort for MockDisplay {
    fn render(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        if self.failing {
            return Err(DisplayError::WriteFailed);
        }
        self.frames
            .lock()
            .unwrap()
            .push((line1.to_owned(), line2.to_owned()));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ── Telemetry ─────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockTelemetry(pub Arc<Mutex<Vec<String>>>);

#[allow(dead_code)]
impl MockTelemetry {
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl TelemetryPort for MockTelemetry {
    fn emit(&mut self, line: &str) -> Result<(), TelemetryError> {
        self.0.lock().unwrap().push(line.to_owned());
        Ok(())
    }
}

// ── Clock ─────────────────────────────────────────────────────

pub struct FixedClock(pub &'static str);

impl Clock for FixedClock {
    fn now_label(&self) -> String {
        self.0.to_owned()
    }
}

// ── Sensor ────────────────────────────────────────────────────

/// Sensor whose reading the test controls, in Fahrenheit for
/// readability.
#[derive(Clone)]
pub struct MockSensor(Arc<Mutex<Result<f32, SensorError>>>);

#[allow(dead_code)]
impl MockSensor {
    pub fn fahrenheit(f: f32) -> Self {
        let s = Self(Arc::new(Mutex::new(Ok(0.0))));
        s.set_fahrenheit(f);
        s
    }

    /// Sets a Celsius value that floors back to exactly `f` degrees F.
    pub fn set_fahrenheit(&self, f: f32) {
        *self.0.lock().unwrap() = Ok((f + 0.05 - 32.0) * 5.0 / 9.0);
    }

    pub fn fail(&self, e: SensorError) {
        *self.0.lock().unwrap() = Err(e);
    }
}

impl SensorPort for MockSensor {
    fn read(&mut self) -> Result<f32, SensorError> {
        *self.0.lock().unwrap()
    }
}

// ── Input ─────────────────────────────────────────────────────

/// Input source whose presses the test triggers directly.
#[derive(Default)]
pub struct ManualInput {
    pub slots: HandlerSlots,
    pub replaced: usize,
    pub started: bool,
}

#[allow(dead_code)]
impl ManualInput {
    pub fn press(&self, b: Button) -> bool {
        self.slots.fire(b)
    }
}

impl InputSource for ManualInput {
    fn on_press(&mut self, button: Button, handler: PressHandler) {
        if self.slots.set(button, handler) {
            self.replaced += 1;
        }
    }

    fn start(&mut self) -> Result<(), InputError> {
        if self.started {
            return Err(InputError::AlreadyStarted);
        }
        self.started = true;
        Ok(())
    }
}
