//! Debounced push-button input source.
//!
//! ## Hardware
//!
//! Active-low momentary switches with pull-ups.  A poller thread samples
//! every pin at a fixed rate and feeds each sample through a
//! [`Debouncer`]; a level must hold steady for [`DEBOUNCE_MS`] before it
//! counts, so one physical press yields exactly one event however much
//! the contacts bounce.
//!
//! The press handler runs on the poller thread.

use std::sync::Arc;
use std::time::{Duration, Instant};

use embedded_hal::digital::InputPin;
use log::{info, trace, warn};

use crate::app::ports::{Button, HandlerSlots, InputSource, PressHandler};
use crate::app::shared::StopFlag;
use crate::drivers::task::spawn_named;
use crate::error::InputError;

pub const DEBOUNCE_MS: u64 = 50;
const POLL_MS: u64 = 5;

/// Press-edge detector for one input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Debouncer {
    stable: bool,
    candidate: bool,
    since_ms: u64,
}

impl Debouncer {
    /// Feed one raw sample (`true` = pressed) taken at `now_ms`.
    /// Returns `true` exactly once per debounced press.
    pub fn update(&mut self, now_ms: u64, pressed: bool) -> bool {
        if pressed != self.candidate {
            self.candidate = pressed;
            self.since_ms = now_ms;
            return false;
        }
        if self.candidate != self.stable && now_ms.saturating_sub(self.since_ms) >= DEBOUNCE_MS {
            self.stable = self.candidate;
            return self.stable;
        }
        false
    }

    pub fn is_pressed(&self) -> bool {
        self.stable
    }
}

/// Buttons wired to GPIO inputs.
pub struct GpioButtons<P> {
    pins: Vec<(Button, P)>,
    slots: Option<HandlerSlots>,
    stop: Arc<StopFlag>,
}

impl<P> GpioButtons<P>
where
    P: InputPin + Send + 'static,
{
    pub fn new(pins: Vec<(Button, P)>, stop: Arc<StopFlag>) -> Self {
        Self {
            pins,
            slots: Some(HandlerSlots::default()),
            stop,
        }
    }
}

impl<P> InputSource for GpioButtons<P>
where
    P: InputPin + Send + 'static,
{
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
        let mut pins = std::mem::take(&mut self.pins);
        let stop = Arc::clone(&self.stop);
        for (b, _) in &pins {
            info!("{:?} button on GPIO {}", b, b.gpio());
        }
        spawn_named("buttons", 16, move || {
            let start = Instant::now();
            let mut debouncers = vec![Debouncer::default(); pins.len()];
            while !stop.is_requested() {
                let now = start.elapsed().as_millis() as u64;
                for ((button, pin), deb) in pins.iter_mut().zip(debouncers.iter_mut()) {
                    let pressed = match pin.is_low() {
                        Ok(low) => low,
                        Err(e) => {
                            trace!("{:?} read failed: {:?}", button, e);
                            false
                        }
                    };
                    if deb.update(now, pressed) {
                        slots.fire(*button);
                    }
                }
                std::thread::sleep(Duration::from_millis(POLL_MS));
            }
        })
        .map(|_| ())
        .map_err(|_| InputError::SpawnFailed)
    }
}
