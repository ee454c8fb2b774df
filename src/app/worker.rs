//! Worker loops: one background thread per control loop.
//!
//! A worker owns (or shares, for the thermostat) its state engine and
//! output handles, polls the [`StopFlag`] at the top of every outer
//! iteration, and on exit shuts down in order: engine exit action,
//! outputs off, display cleared.
//!
//! Failure handling per iteration:
//!
//! | Failure             | Effect                                  |
//! |---------------------|-----------------------------------------|
//! | display write       | logged, loop continues                  |
//! | telemetry write     | logged, loop continues                  |
//! | sensor read         | current tick aborted, next tick normal  |
//! | invalid transition  | Morse worker stops, stop flag raised    |

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use super::ports::{ActuatorPort, Clock, DisplayPort, SensorPort, TelemetryPort};
use super::shared::{ActiveMessage, StopFlag};
use crate::control::morse::transmit;
use crate::control::schedule::{TickPlan, TickSchedule, View};
use crate::control::thermostat::{Thermostat, temperature_line};
use crate::drivers::task::{WORKER_STACK_KB, spawn_named};
use crate::error::Result;
use crate::fsm::context::MorseContext;
use crate::fsm::morse::{MorseFsm, MorseState, new_fsm};

// ═══════════════════════════════════════════════════════════════════════════
//  Morse
// ═══════════════════════════════════════════════════════════════════════════

pub struct MorseWorker<A, D, P> {
    fsm: MorseFsm<A, D>,
    ctx: MorseContext<A, D>,
    display: P,
    message: Arc<ActiveMessage>,
    stop: Arc<StopFlag>,
    sent: u64,
}

impl<A, D, P> MorseWorker<A, D, P>
where
    A: ActuatorPort,
    D: DelayNs,
    P: DisplayPort,
{
    /// Build the engine and run its initial enter action.
    pub fn new(
        mut ctx: MorseContext<A, D>,
        display: P,
        message: Arc<ActiveMessage>,
        stop: Arc<StopFlag>,
    ) -> Result<Self> {
        let mut fsm = new_fsm();
        fsm.start(&mut ctx)?;
        Ok(Self {
            fsm,
            ctx,
            display,
            message,
            stop,
            sent: 0,
        })
    }

    /// Send the current message once.  Returns the number of holds
    /// driven.
    pub fn send_once(&mut self) -> Result<usize> {
        let msg = self.message.current();
        if let Err(e) = self.display.render("Sending:", &msg) {
            warn!("display: {}", e);
        }
        let mut holds = transmit(&mut self.fsm, &mut self.ctx, &msg)?;
        if holds == 0 {
            // nothing encodable: idle one word gap so the loop never spins
            self.fsm.transition(MorseState::WordPause, &mut self.ctx)?;
            holds = 1;
        }
        self.sent += 1;
        Ok(holds)
    }

    /// Loop until the stop flag is raised, then shut down.
    pub fn run(mut self) -> Result<()> {
        info!("Morse worker running");
        let result = loop {
            if self.stop.is_requested() {
                break Ok(());
            }
            if let Err(e) = self.send_once() {
                error!("Morse worker stopping: {}", e);
                self.stop.request();
                break Err(e);
            }
        };
        self.shutdown();
        info!("Morse worker stopped after {} messages", self.sent);
        result
    }

    /// Engine exit action, both lights off, display cleared.
    pub fn shutdown(&mut self) {
        self.fsm.shutdown(&mut self.ctx);
        self.ctx.all_off();
        if let Err(e) = self.display.clear() {
            warn!("display clear: {}", e);
        }
    }

    pub fn current_state(&self) -> MorseState {
        self.fsm.current_state()
    }

    pub fn messages_sent(&self) -> u64 {
        self.sent
    }

    pub fn display(&self) -> &P {
        &self.display
    }
}

impl<A, D, P> MorseWorker<A, D, P>
where
    A: ActuatorPort + Send + 'static,
    D: DelayNs + Send + 'static,
    P: DisplayPort + Send + 'static,
{
    pub fn spawn(self) -> Result<JoinHandle<Result<()>>> {
        spawn_named("morse-worker", WORKER_STACK_KB, move || self.run())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Thermostat
// ═══════════════════════════════════════════════════════════════════════════

/// Output side of the thermostat worker.
pub struct ThermostatIo<P, T, C, D> {
    pub display: P,
    pub telemetry: T,
    pub clock: C,
    pub delay: D,
}

pub struct ThermostatWorker<A, S, P, T, C, D> {
    core: Arc<Mutex<Thermostat<A, S>>>,
    io: ThermostatIo<P, T, C, D>,
    schedule: TickSchedule,
    tick_ms: u32,
    stop: Arc<StopFlag>,
}

impl<A, S, P, T, C, D> ThermostatWorker<A, S, P, T, C, D>
where
    A: ActuatorPort,
    S: SensorPort,
    P: DisplayPort,
    T: TelemetryPort,
    C: Clock,
    D: DelayNs,
{
    pub fn new(
        core: Arc<Mutex<Thermostat<A, S>>>,
        io: ThermostatIo<P, T, C, D>,
        schedule: TickSchedule,
        tick_ms: u32,
        stop: Arc<StopFlag>,
    ) -> Self {
        Self {
            core,
            io,
            schedule,
            tick_ms,
            stop,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Thermostat<A, S>> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One tick's work, without the tick delay.  A sensor failure aborts
    /// the rest of the tick.
    pub fn tick(&mut self) -> Result<TickPlan> {
        let plan = self.schedule.next_tick();

        let (measured, status) = {
            let mut t = self.lock();
            (t.measure()?, t.status_line())
        };
        let line2 = match plan.view {
            View::Temperature => temperature_line(measured),
            View::Status => status,
        };
        let line1 = self.io.clock.now_label();
        if let Err(e) = self.io.display.render(&line1, &line2) {
            warn!("display: {}", e);
        }

        if plan.recompute {
            self.lock().recompute_actuation()?;
        }

        if plan.telemetry {
            let line = self.lock().telemetry_line(measured);
            if let Err(e) = self.io.telemetry.emit(&line) {
                warn!("telemetry: {}", e);
            }
        }
        Ok(plan)
    }

    /// Tick at the configured period until the stop flag is raised.
    pub fn run(mut self) -> Result<()> {
        info!("Thermostat worker running ({} ms tick)", self.tick_ms);
        while !self.stop.is_requested() {
            // tick() only fails on a sensor read; the next tick retries
            if let Err(e) = self.tick() {
                warn!("tick {} aborted: {}", self.schedule.ticks(), e);
            }
            self.io.delay.delay_ms(self.tick_ms);
        }
        self.shutdown();
        Ok(())
    }

    /// Engine exit action, lights off, display cleared.
    pub fn shutdown(&mut self) {
        self.lock().shutdown();
        if let Err(e) = self.io.display.clear() {
            warn!("display clear: {}", e);
        }
        info!("Thermostat worker stopped after {} ticks", self.schedule.ticks());
    }
}

impl<A, S, P, T, C, D> ThermostatWorker<A, S, P, T, C, D>
where
    A: ActuatorPort + Send + 'static,
    S: SensorPort + Send + 'static,
    P: DisplayPort + Send + 'static,
    T: TelemetryPort + Send + 'static,
    C: Clock + Send + 'static,
    D: DelayNs + Send + 'static,
{
    pub fn spawn(self) -> Result<JoinHandle<Result<()>>> {
        spawn_named("thermostat-worker", WORKER_STACK_KB, move || self.run())
    }
}
