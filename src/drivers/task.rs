//! Named worker thread spawning.
//!
//! Every long-running loop (Morse worker, thermostat worker, button
//! poller, stdin reader) runs on its own named thread with an explicit
//! stack size, so thread names show up in logs and panics.

use std::thread::JoinHandle;

use log::info;

use crate::error::Error;

/// Default stack for control-loop threads.
pub const WORKER_STACK_KB: usize = 64;

/// Spawn `f` on a new thread called `name`.
pub fn spawn_named<T, F>(name: &'static str, stack_kb: usize, f: F) -> Result<JoinHandle<T>, Error>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    info!("Spawning '{}' (stack={}KB)", name, stack_kb);
    std::thread::Builder::new()
        .name(name.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
        .map_err(|_| Error::Spawn(name))
}
