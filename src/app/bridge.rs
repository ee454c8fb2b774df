//! Event bridge: button presses to control-variable mutations.
//!
//! Runs on the input source's delivery thread.  Handlers only flip
//! shared state or take the thermostat lock for one transition and
//! one recompute; they never wait on a timed hold.

use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info, warn};

use super::commands::{AppCommand, Bindings, lookup};
use super::ports::{ActuatorPort, Button, InputSource, SensorPort};
use super::shared::ActiveMessage;
use crate::control::thermostat::Thermostat;
use crate::error::Result;

/// Something an [`AppCommand`] can be executed against.
pub trait CommandTarget: Send + Sync + 'static {
    fn execute(&self, cmd: AppCommand) -> Result<()>;
}

impl CommandTarget for ActiveMessage {
    fn execute(&self, cmd: AppCommand) -> Result<()> {
        match cmd {
            AppCommand::ToggleMessage => {
                self.toggle();
            }
            other => debug!("morse ignores {:?}", other),
        }
        Ok(())
    }
}

impl<A, S> CommandTarget for Mutex<Thermostat<A, S>>
where
    A: ActuatorPort + Send + 'static,
    S: SensorPort + Send + 'static,
{
    fn execute(&self, cmd: AppCommand) -> Result<()> {
        let mut t = self.lock().unwrap_or_else(PoisonError::into_inner);
        match cmd {
            AppCommand::CycleMode => {
                t.cycle_mode()?;
            }
            AppCommand::AdjustSetPoint(delta) => {
                t.adjust_set_point(delta);
            }
            AppCommand::ToggleMessage => {
                debug!("thermostat ignores {:?}", cmd);
                return Ok(());
            }
        }
        t.recompute_actuation()?;
        Ok(())
    }
}

/// Binds buttons to commands on one target.
pub struct EventBridge<T> {
    target: Arc<T>,
    bindings: Bindings,
}

impl<T: CommandTarget> EventBridge<T> {
    pub fn new(target: Arc<T>, bindings: Bindings) -> Self {
        Self { target, bindings }
    }

    /// Register one handler per bound button with `input`.
    pub fn attach(&self, input: &mut impl InputSource) {
        for &(button, cmd) in self.bindings {
            let target = Arc::clone(&self.target);
            input.on_press(
                button,
                Box::new(move || {
                    info!("{:?} button pressed", button);
                    if let Err(e) = target.execute(cmd) {
                        warn!("{:?} failed: {}", cmd, e);
                    }
                }),
            );
        }
    }

    /// Execute one command directly.
    pub fn dispatch(&self, cmd: AppCommand) -> Result<()> {
        debug!("dispatch {:?}", cmd);
        self.target.execute(cmd)
    }

    /// Execute whatever `button` is bound to.  Returns `false` when it
    /// has no binding.
    pub fn press(&self, button: Button) -> Result<bool> {
        match lookup(self.bindings, button) {
            Some(cmd) => self.dispatch(cmd).map(|()| true),
            None => Ok(false),
        }
    }
}
