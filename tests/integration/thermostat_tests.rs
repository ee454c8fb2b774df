//! Thermostat core, bridge and worker against mock hardware.

use std::sync::{Arc, Mutex};

use holdctl::app::bridge::EventBridge;
use holdctl::app::commands::{AppCommand, THERMOSTAT_BINDINGS};
use holdctl::app::ports::Button;
use holdctl::app::shared::{SetPoint, StopFlag};
use holdctl::app::worker::{ThermostatIo, ThermostatWorker};
use holdctl::control::schedule::{TickSchedule, View};
use holdctl::control::thermostat::Thermostat;
use holdctl::error::{Error, SensorError};
use holdctl::fsm::context::{Level, Lights};
use holdctl::fsm::thermostat::{self, Mode};

use crate::mock_hw::{
    Event, FixedClock, ManualInput, MockDelay, MockDisplay, MockLed, MockSensor, MockTelemetry,
    Timeline,
};

type Core = Arc<Mutex<Thermostat<MockLed, MockSensor>>>;
type Worker =
    ThermostatWorker<MockLed, MockSensor, MockDisplay, MockTelemetry, FixedClock, MockDelay>;

struct Rig {
    core: Core,
    sensor: MockSensor,
    set_point: Arc<SetPoint>,
    timeline: Timeline,
    input: ManualInput,
}

fn rig(temp_f: f32, sp: i32) -> Rig {
    let timeline = Timeline::default();
    let sensor = MockSensor::fahrenheit(temp_f);
    let set_point = Arc::new(SetPoint::new(sp));
    let core = Arc::new(Mutex::new(
        Thermostat::new(
            MockLed::new("red", &timeline),
            MockLed::new("blue", &timeline),
            sensor.clone(),
            set_point.clone(),
        )
        .unwrap(),
    ));
    let mut input = ManualInput::default();
    EventBridge::new(core.clone(), THERMOSTAT_BINDINGS).attach(&mut input);
    Rig {
        core,
        sensor,
        set_point,
        timeline,
        input,
    }
}

fn worker(r: &Rig, delay: MockDelay, stop: Arc<StopFlag>) -> (Worker, MockDisplay, MockTelemetry) {
    let display = MockDisplay::default();
    let telemetry = MockTelemetry::default();
    let w = ThermostatWorker::new(
        r.core.clone(),
        ThermostatIo {
            display: display.clone(),
            telemetry: telemetry.clone(),
            clock: FixedClock("03/07 09:05"),
            delay,
        },
        TickSchedule::new(5, 30),
        1000,
        stop,
    );
    (w, display, telemetry)
}

fn levels(r: &Rig) -> (Level, Level) {
    r.core.lock().unwrap().levels()
}

// ── Scenarios ─────────────────────────────────────────────────

#[test]
fn heat_below_set_point_pulses_red() {
    let r = rig(70.0, 72);
    r.input.press(Button::Green);
    assert_eq!(r.core.lock().unwrap().mode(), Mode::Heat);
    assert_eq!(levels(&r), (Level::Pulse, Level::Off));
}

#[test]
fn heat_at_or_above_set_point_holds_red_on() {
    let r = rig(70.0, 72);
    r.input.press(Button::Green);
    r.sensor.set_fahrenheit(75.0);
    r.core.lock().unwrap().recompute_actuation().unwrap();
    assert_eq!(levels(&r), (Level::On, Level::Off));
}

#[test]
fn cool_above_set_point_pulses_blue() {
    let r = rig(80.0, 72);
    r.input.press(Button::Green);
    r.input.press(Button::Green);
    assert_eq!(levels(&r), (Level::Off, Level::Pulse));
    r.sensor.set_fahrenheit(72.0);
    r.core.lock().unwrap().recompute_actuation().unwrap();
    assert_eq!(levels(&r), (Level::Off, Level::On));
}

#[test]
fn off_turns_both_lights_off() {
    let r = rig(70.0, 72);
    for _ in 0..3 {
        r.input.press(Button::Green);
    }
    assert_eq!(r.core.lock().unwrap().mode(), Mode::Off);
    assert_eq!(levels(&r), (Level::Off, Level::Off));
}

#[test]
fn set_point_buttons_reevaluate_immediately() {
    let r = rig(70.0, 70);
    r.input.press(Button::Green);
    assert_eq!(levels(&r), (Level::On, Level::Off));

    r.input.press(Button::Red);
    assert_eq!(r.set_point.get(), 71);
    assert_eq!(levels(&r), (Level::Pulse, Level::Off));

    r.input.press(Button::Blue);
    assert_eq!(r.set_point.get(), 70);
    assert_eq!(levels(&r), (Level::On, Level::Off));
}

#[test]
fn recompute_twice_issues_identical_commands() {
    let r = rig(70.0, 72);
    r.input.press(Button::Green);
    r.timeline.clear();
    r.core.lock().unwrap().recompute_actuation().unwrap();
    let first = r.timeline.events();
    r.timeline.clear();
    r.core.lock().unwrap().recompute_actuation().unwrap();
    assert_eq!(r.timeline.events(), first);
    assert_eq!(first, [Event::Pulse("red"), Event::Off("blue")]);
}

#[test]
fn dispatch_matches_button_path() {
    let r = rig(70.0, 72);
    let bridge = EventBridge::new(r.core.clone(), THERMOSTAT_BINDINGS);
    bridge.dispatch(AppCommand::AdjustSetPoint(5)).unwrap();
    assert_eq!(r.set_point.get(), 77);
    assert!(bridge.press(Button::Green).unwrap());
    assert_eq!(r.core.lock().unwrap().mode(), Mode::Heat);
}

#[test]
fn sensor_failure_surfaces_from_button_path() {
    let r = rig(70.0, 72);
    r.sensor.fail(SensorError::ReadFailed);
    let bridge = EventBridge::new(r.core.clone(), THERMOSTAT_BINDINGS);
    assert_eq!(
        bridge.dispatch(AppCommand::CycleMode),
        Err(Error::Sensor(SensorError::ReadFailed))
    );
    // the mode change itself still happened
    assert_eq!(r.core.lock().unwrap().mode(), Mode::Heat);
}

// ── Worker cadence ────────────────────────────────────────────

#[test]
fn display_alternates_five_and_five() {
    let r = rig(70.0, 72);
    let (mut w, display, _) = worker(&r, MockDelay::new(&r.timeline), Arc::new(StopFlag::new()));

    for _ in 0..20 {
        w.tick().unwrap();
    }
    let l2 = display.line2s();
    for (i, line) in l2.iter().enumerate() {
        let expected = if i % 10 < 5 { "Temp: 70F" } else { "OFF 72F" };
        assert_eq!(line, expected, "tick {}", i + 1);
    }
    assert!(display.frames().iter().all(|(l1, _)| l1 == "03/07 09:05"));
}

#[test]
fn telemetry_every_thirty_ticks() {
    let r = rig(70.0, 72);
    r.input.press(Button::Green);
    let (mut w, _, telemetry) = worker(&r, MockDelay::new(&r.timeline), Arc::new(StopFlag::new()));

    for _ in 0..29 {
        w.tick().unwrap();
    }
    assert!(telemetry.lines().is_empty());
    let plan = w.tick().unwrap();
    assert!(plan.telemetry);
    assert_eq!(plan.view, View::Status);
    assert_eq!(telemetry.lines(), ["heat,70,72"]);
}

#[test]
fn window_end_recomputes_actuation() {
    let r = rig(70.0, 72);
    r.input.press(Button::Green);
    let (mut w, _, _) = worker(&r, MockDelay::new(&r.timeline), Arc::new(StopFlag::new()));

    // temperature rises without any button press
    r.sensor.set_fahrenheit(74.0);
    for _ in 0..9 {
        assert!(!w.tick().unwrap().recompute);
    }
    assert_eq!(levels(&r), (Level::Pulse, Level::Off));
    assert!(w.tick().unwrap().recompute);
    assert_eq!(levels(&r), (Level::On, Level::Off));
}

#[test]
fn sensor_failure_aborts_only_that_tick() {
    let r = rig(70.0, 72);
    let (mut w, display, _) = worker(&r, MockDelay::new(&r.timeline), Arc::new(StopFlag::new()));

    r.sensor.fail(SensorError::ReadFailed);
    assert_eq!(w.tick(), Err(Error::Sensor(SensorError::ReadFailed)));
    assert!(display.frames().is_empty());

    r.sensor.set_fahrenheit(71.0);
    w.tick().unwrap();
    assert_eq!(display.line2s(), ["Temp: 71F"]);
}

#[test]
fn run_ticks_until_stopped_then_shuts_down() {
    let r = rig(70.0, 72);
    r.input.press(Button::Green);
    let stop = Arc::new(StopFlag::new());
    let delay = MockDelay::stopping_after(&r.timeline, 12, &stop);
    let (w, display, _) = worker(&r, delay, stop.clone());

    r.sensor.fail(SensorError::OutOfRange);
    w.run().unwrap();

    assert!(stop.is_requested());
    assert_eq!(r.timeline.holds(), vec![1_000_000; 12]);
    assert!(display.frames().is_empty());
    assert!(display.cleared());
    assert_eq!(levels(&r), (Level::Off, Level::Off));
}

// ── Concurrency ───────────────────────────────────────────────

#[test]
fn mode_cycling_during_ticks_stays_consistent() {
    let r = rig(70.0, 72);
    let stop = Arc::new(StopFlag::new());
    let delay = MockDelay::stopping_after(&r.timeline, 5_000, &stop);
    let (w, _, _) = worker(&r, delay, stop.clone());
    let handle = w.spawn().unwrap();

    const PRESSES: usize = 301;
    for _ in 0..PRESSES {
        r.input.press(Button::Green);
        let mode = r.core.lock().unwrap().mode();
        assert!(Mode::ALL.contains(&mode));
    }
    stop.request();
    handle.join().unwrap().unwrap();

    let t = r.core.lock().unwrap();
    assert_eq!(t.mode(), Mode::ALL[PRESSES % 3]);
}

// ── Engine guard ──────────────────────────────────────────────

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "invalid transition off -> cool")]
fn undeclared_edge_aborts_debug_builds() {
    let tl = Timeline::default();
    let mut fsm = thermostat::new_fsm::<MockLed>();
    let mut lights = Lights::new(MockLed::new("red", &tl), MockLed::new("blue", &tl));
    let _ = fsm.transition(Mode::Cool, &mut lights);
}
