//! Control variables shared between the worker and the input context.
//!
//! Exactly two actors touch these: the worker loop (reader) and the
//! button delivery thread (writer).  Every write replaces the whole unit
//! the worker reads, so the worker can never observe a torn value:
//!
//! | Variable          | Mechanism                                  |
//! |-------------------|--------------------------------------------|
//! | [`ActiveMessage`] | critical-section mutex, whole-string swap  |
//! | [`SetPoint`]      | `AtomicI32`                                |
//! | [`StopFlag`]      | `AtomicBool`                               |

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::info;

/// Longest message the signaler accepts, in bytes.
pub const MAX_MESSAGE_LEN: usize = 32;

/// Fixed-capacity message text; never reallocated.
pub type Message = heapless::String<MAX_MESSAGE_LEN>;

/// Returned when a message exceeds [`MAX_MESSAGE_LEN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTooLong;

impl core::fmt::Display for MessageTooLong {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "message longer than {} bytes", MAX_MESSAGE_LEN)
    }
}

impl std::error::Error for MessageTooLong {}

fn to_message(text: &str) -> Result<Message, MessageTooLong> {
    Message::try_from(text).map_err(|_| MessageTooLong)
}

// ───────────────────────────────────────────────────────────────
// ActiveMessage
// ───────────────────────────────────────────────────────────────

/// The message the Morse worker transmits, toggled between two fixed
/// strings by the green button.
pub struct ActiveMessage {
    primary: Message,
    alternate: Message,
    current: Mutex<CriticalSectionRawMutex, RefCell<Message>>,
}

impl ActiveMessage {
    /// Start on `primary`.
    pub fn new(primary: &str, alternate: &str) -> Result<Self, MessageTooLong> {
        let primary = to_message(primary)?;
        let alternate = to_message(alternate)?;
        Ok(Self {
            current: Mutex::new(RefCell::new(primary.clone())),
            primary,
            alternate,
        })
    }

    /// Snapshot of the current message.
    pub fn current(&self) -> Message {
        self.current.lock(|cell| cell.borrow().clone())
    }

    /// Swap to the other fixed message and return it.
    pub fn toggle(&self) -> Message {
        let next = self.current.lock(|cell| {
            let mut current = cell.borrow_mut();
            let next = if *current == self.primary {
                self.alternate.clone()
            } else {
                self.primary.clone()
            };
            *current = next.clone();
            next
        });
        info!("* Toggling active message to: {}", next);
        next
    }

    /// Replace the current message with arbitrary text.
    pub fn set(&self, text: &str) -> Result<(), MessageTooLong> {
        let next = to_message(text)?;
        self.current.lock(|cell| *cell.borrow_mut() = next);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// SetPoint
// ───────────────────────────────────────────────────────────────

/// Thermostat target temperature in whole degrees Fahrenheit.
///
/// Unbounded apart from saturating at the `i32` range.
#[derive(Debug)]
pub struct SetPoint(AtomicI32);

impl SetPoint {
    pub fn new(initial_f: i32) -> Self {
        Self(AtomicI32::new(initial_f))
    }

    pub fn get(&self) -> i32 {
        self.0.load(Ordering::Acquire)
    }

    /// Add `delta` and return the new value.
    pub fn adjust(&self, delta: i32) -> i32 {
        let prev = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| {
                Some(v.saturating_add(delta))
            })
            .unwrap_or_else(|v| v);
        prev.saturating_add(delta)
    }
}

// ───────────────────────────────────────────────────────────────
// StopFlag
// ───────────────────────────────────────────────────────────────

/// One-way shutdown request, polled at the top of each worker iteration.
#[derive(Debug, Default)]
pub struct StopFlag(AtomicBool);

impl StopFlag {
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
