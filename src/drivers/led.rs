//! Indicator LED drivers.
//!
//! - [`PwmLed`]: any `embedded_hal` PWM channel.  `pulse()` starts a
//!   triangular fade on a helper thread; `on()`/`off()` stop it.
//! - [`SimLed`]: host stand-in that records its level and logs changes.
//!
//! ## Fade curve
//!
//! Triangular approximation of a sine (no libm): brightness ramps
//! 0 -> 255 over the first half of the period and back to 0 over the
//! second half.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use embedded_hal::pwm::SetDutyCycle;
use log::{debug, warn};

use crate::app::ports::ActuatorPort;
use crate::drivers::task::spawn_named;
use crate::fsm::context::Level;

/// Fade update interval.
const FADE_STEP_MS: u64 = 10;

/// Brightness (0-255) at `phase_ms` into a `period_ms` fade.
pub fn fade_level(phase_ms: u32, period_ms: u32) -> u8 {
    let period = u64::from(period_ms.max(2));
    let pos = u64::from(phase_ms) % period;
    let half = period / 2;
    if pos < half {
        ((pos * 255) / half) as u8
    } else {
        (((period - pos) * 255 / half).min(255)) as u8
    }
}

// ───────────────────────────────────────────────────────────────
// PWM driver
// ───────────────────────────────────────────────────────────────

/// Write one fade level.  The first failure of a pulse is logged; later
/// ones are not.
fn fade_step<P: SetDutyCycle>(name: &str, pwm: &Mutex<P>, level: u8, warned: &mut bool) {
    let mut p = pwm.lock().unwrap_or_else(PoisonError::into_inner);
    if let Err(e) = p.set_duty_cycle_fraction(u16::from(level), 255) {
        if !*warned {
            warn!("{}: PWM fade write failed: {:?}", name, e);
            *warned = true;
        }
    }
}

struct Pulser {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// PWM-driven indicator.
pub struct PwmLed<P> {
    name: &'static str,
    pwm: Arc<Mutex<P>>,
    period_ms: u32,
    pulser: Option<Pulser>,
}

impl<P> PwmLed<P>
where
    P: SetDutyCycle + Send + 'static,
{
    pub fn new(name: &'static str, pwm: P, period_ms: u32) -> Self {
        Self {
            name,
            pwm: Arc::new(Mutex::new(pwm)),
            period_ms,
            pulser: None,
        }
    }

    pub fn is_pulsing(&self) -> bool {
        self.pulser.is_some()
    }

    fn stop_pulse(&mut self) {
        if let Some(p) = self.pulser.take() {
            p.stop.store(true, Ordering::Release);
            if p.handle.join().is_err() {
                warn!("{}: fade thread panicked", self.name);
            }
        }
    }

    fn with_pwm(&self, f: impl FnOnce(&mut P) -> Result<(), P::Error>) {
        let mut pwm = self.pwm.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = f(&mut pwm) {
            warn!("{}: PWM write failed: {:?}", self.name, e);
        }
    }
}

impl<P> ActuatorPort for PwmLed<P>
where
    P: SetDutyCycle + Send + 'static,
{
    fn on(&mut self) {
        self.stop_pulse();
        self.with_pwm(|p| p.set_duty_cycle_fully_on());
    }

    fn off(&mut self) {
        self.stop_pulse();
        self.with_pwm(|p| p.set_duty_cycle_fully_off());
    }

    fn pulse(&mut self) {
        if self.pulser.is_some() {
            return;
        }
        let stop = Arc::new(AtomicBool::new(false));
        let pwm = Arc::clone(&self.pwm);
        let period = self.period_ms;
        let name = self.name;
        let flag = Arc::clone(&stop);
        let spawned = spawn_named("led-fade", 16, move || {
            let start = Instant::now();
            let mut warned = false;
            while !flag.load(Ordering::Acquire) {
                let phase = start.elapsed().as_millis() as u32;
                fade_step(name, &pwm, fade_level(phase, period), &mut warned);
                std::thread::sleep(Duration::from_millis(FADE_STEP_MS));
            }
        });
        match spawned {
            Ok(handle) => {
                debug!("{}: pulsing", self.name);
                self.pulser = Some(Pulser { stop, handle });
            }
            Err(e) => {
                warn!("{}: {}, holding steady on", self.name, e);
                self.with_pwm(|p| p.set_duty_cycle_fully_on());
            }
        }
    }
}

impl<P> Drop for PwmLed<P> {
    fn drop(&mut self) {
        if let Some(p) = self.pulser.take() {
            p.stop.store(true, Ordering::Release);
            let _ = p.handle.join();
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Simulated LED
// ───────────────────────────────────────────────────────────────

/// In-memory indicator.  Clones share the same level, so a test or the
/// console can keep one to observe what the worker commanded.
#[derive(Clone)]
pub struct SimLed {
    name: &'static str,
    gpio: u8,
    level: Arc<AtomicU8>,
}

impl SimLed {
    pub fn new(name: &'static str, gpio: u8) -> Self {
        Self {
            name,
            gpio,
            level: Arc::new(AtomicU8::new(0)),
        }
    }

    pub fn level(&self) -> Level {
        match self.level.load(Ordering::Acquire) {
            1 => Level::On,
            2 => Level::Pulse,
            _ => Level::Off,
        }
    }

    fn set(&self, level: Level) {
        let raw = match level {
            Level::Off => 0,
            Level::On => 1,
            Level::Pulse => 2,
        };
        if self.level.swap(raw, Ordering::AcqRel) != raw {
            debug!("LED {}(gpio{}) -> {:?}", self.name, self.gpio, level);
        }
    }
}

impl ActuatorPort for SimLed {
    fn on(&mut self) {
        self.set(Level::On);
    }

    fn off(&mut self) {
        self.set(Level::Off);
    }

    fn pulse(&mut self) {
        self.set(Level::Pulse);
    }
}
