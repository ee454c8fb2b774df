//! Threshold controller for the thermostat.
//!
//! [`Thermostat`] owns the mode engine, the red/blue lights and the
//! temperature sensor.  Callers share it behind a `Mutex` so every mode
//! transition and every actuation is serialized, whichever thread
//! triggers it.  The set point lives outside the lock in a [`SetPoint`]
//! atomic.
//!
//! | Mode | M < SP     | M == SP   | M > SP     |
//! |------|------------|-----------|------------|
//! | heat | red pulse  | red on    | red on     |
//! | cool | blue on    | blue on   | blue pulse |
//! | off  | both off   | both off  | both off   |

use std::sync::Arc;

use log::{debug, info};

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::app::shared::SetPoint;
use crate::error::{InvalidTransition, SensorError};
use crate::fsm::context::{Level, Lights};
use crate::fsm::thermostat::{Mode, ThermostatFsm, new_fsm};

/// Convert a Celsius reading to Fahrenheit.
pub fn celsius_to_fahrenheit(c: f32) -> f32 {
    c * 9.0 / 5.0 + 32.0
}

/// Indicator levels `(red, blue)` for a mode, a floored measurement and
/// a set point, all in degrees Fahrenheit.
pub fn demand(mode: Mode, measured_f: i32, set_point_f: i32) -> (Level, Level) {
    match mode {
        Mode::Off => (Level::Off, Level::Off),
        Mode::Heat if measured_f < set_point_f => (Level::Pulse, Level::Off),
        Mode::Heat => (Level::On, Level::Off),
        Mode::Cool if measured_f > set_point_f => (Level::Off, Level::Pulse),
        Mode::Cool => (Level::Off, Level::On),
    }
}

pub struct Thermostat<A, S> {
    fsm: ThermostatFsm<A>,
    lights: Lights<A>,
    sensor: S,
    set_point: Arc<SetPoint>,
}

impl<A: ActuatorPort, S: SensorPort> Thermostat<A, S> {
    /// Build the controller in `Off` and run its initial enter action.
    pub fn new(
        red: A,
        blue: A,
        sensor: S,
        set_point: Arc<SetPoint>,
    ) -> Result<Self, InvalidTransition> {
        let mut fsm = new_fsm();
        let mut lights = Lights::new(red, blue);
        fsm.start(&mut lights)?;
        Ok(Self {
            fsm,
            lights,
            sensor,
            set_point,
        })
    }

    pub fn mode(&self) -> Mode {
        self.fsm.current_state()
    }

    /// Advance off -> heat -> cool -> off by one step.
    pub fn cycle_mode(&mut self) -> Result<Mode, InvalidTransition> {
        let next = self.mode().next();
        self.fsm.transition(next, &mut self.lights)?;
        Ok(next)
    }

    /// Add `delta` to the set point and return the new value.
    pub fn adjust_set_point(&self, delta: i32) -> i32 {
        let sp = self.set_point.adjust(delta);
        info!("* Set point now {}F", sp);
        sp
    }

    pub fn set_point(&self) -> i32 {
        self.set_point.get()
    }

    /// Current temperature, Fahrenheit, floored to a whole degree.
    pub fn measure(&mut self) -> Result<i32, SensorError> {
        let c = self.sensor.read()?;
        if !c.is_finite() {
            return Err(SensorError::OutOfRange);
        }
        Ok(celsius_to_fahrenheit(c).floor() as i32)
    }

    /// Re-derive both indicator levels from the mode, a fresh measurement
    /// and the set point, and apply them.  Issues the same commands when
    /// the inputs are unchanged.
    pub fn recompute_actuation(&mut self) -> Result<(Level, Level), SensorError> {
        let measured = self.measure()?;
        let sp = self.set_point();
        let (red, blue) = demand(self.mode(), measured, sp);
        debug!(
            "recompute: mode={} M={}F SP={}F -> red={:?} blue={:?}",
            self.mode().label(),
            measured,
            sp,
            red,
            blue
        );
        self.lights.set_red(red);
        self.lights.set_blue(blue);
        Ok((red, blue))
    }

    /// `"<mode>,<measurement>,<setpoint>"`, mode in lower case.
    pub fn telemetry_line(&self, measured_f: i32) -> String {
        format!("{},{},{}", self.mode().label().to_lowercase(), measured_f, self.set_point())
    }

    /// `"<MODE> <setpoint>F"`.
    pub fn status_line(&self) -> String {
        format!("{} {}F", self.mode().label(), self.set_point())
    }

    pub fn levels(&self) -> (Level, Level) {
        self.lights.levels()
    }

    pub fn lights(&self) -> &Lights<A> {
        &self.lights
    }

    /// Run the current mode's exit action, then force both lights off.
    pub fn shutdown(&mut self) {
        self.fsm.shutdown(&mut self.lights);
        self.lights.all_off();
    }
}

/// `"Temp: <measurement>F"`.
pub fn temperature_line(measured_f: i32) -> String {
    format!("Temp: {}F", measured_f)
}
