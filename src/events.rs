//! Inbound events and the serialized event queue.
//!
//! Events are produced by:
//! - The radio stack (subscriptions, app commands)
//! - The button debouncer (press / release)
//! - The shutdown timer (expiry)
//! - Startup code (reset)
//!
//! They are consumed one at a time, run-to-completion, by
//! [`FlashService::run_pending`](crate::app::service::FlashService::run_pending).
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Radio stack │────▶│              │     │              │
//! │ Button      │────▶│  EventQueue  │────▶│ FlashService │
//! │ Timer       │────▶│   (FIFO)     │     │  (consumer)  │
//! │ Startup     │────▶│              │     │              │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use heapless::Deque;
use log::warn;

use crate::protocol::Command;

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 16;

/// Everything the outside world can tell the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Startup, or return to a known baseline.
    Reset,
    /// App subscribed to the Nova characteristic.
    AppConnect,
    /// App unsubscribed from the Nova characteristic.
    AppDisconnect,
    /// Phone subscribed to the HID characteristic.
    HidConnect,
    /// Phone unsubscribed from the HID characteristic.
    HidDisconnect,
    /// Debounced button press began.
    ButtonPressDown,
    /// Debounced button press ended.
    ButtonRelease,
    /// A command arrived from the app.
    AppCommandReceived(Command),
    /// The shutdown timer elapsed without being cancelled.
    TimerComplete,
}

/// Bounded FIFO of pending events.
pub struct EventQueue {
    pending: Deque<Event, EVENT_QUEUE_CAP>,
    dropped: u32,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            pending: Deque::new(),
            dropped: 0,
        }
    }

    /// Queue an event.  Returns `false` if the queue is full (event dropped).
    pub fn push(&mut self, event: Event) -> bool {
        match self.pending.push_back(event) {
            Ok(()) => true,
            Err(event) => {
                self.dropped = self.dropped.saturating_add(1);
                warn!("event queue full, dropping {:?}", event);
                false
            }
        }
    }

    /// Next event in FIFO order.
    pub fn pop(&mut self) -> Option<Event> {
        self.pending.pop_front()
    }

    /// Feed every pending event to `handler`, oldest first.
    ///
    /// Events pushed by the handler itself are not visible until the next
    /// call; the handler only receives `&mut` to itself, not to the queue.
    pub fn drain(&mut self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Events lost to overflow since creation.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
