//! Debounced trigger button.
//!
//! ## Hardware
//!
//! Active-low momentary switch with external pull-up.  The main loop
//! samples the raw level (from a GPIO read or an edge ISR) and feeds it
//! to [`ButtonDebouncer::sample`] together with a monotonic timestamp.
//!
//! ## Debounce
//!
//! The core assumes every press/release it sees is genuine.  A level must
//! be held for [`DEBOUNCE_MS`] before it counts, so contact bounce and
//! presses shorter than that never reach the core.
//!
//! | State           | Input                         | Next            | Event             |
//! |-----------------|-------------------------------|-----------------|-------------------|
//! | Released        | pressed                       | PressPending    | –                 |
//! | PressPending    | released                      | Released        | –                 |
//! | PressPending    | pressed, held ≥ DEBOUNCE_MS   | Pressed         | `ButtonPressDown` |
//! | Pressed         | released                      | ReleasePending  | –                 |
//! | ReleasePending  | pressed                       | Pressed         | –                 |
//! | ReleasePending  | released, held ≥ DEBOUNCE_MS  | Released        | `ButtonRelease`   |

use crate::events::{Event, EventQueue};

/// Minimum time a level must be stable to count.
pub const DEBOUNCE_MS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Released,
    PressPending { since_ms: u64 },
    Pressed,
    ReleasePending { since_ms: u64 },
}

pub struct ButtonDebouncer {
    state: DebounceState,
}

impl Default for ButtonDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonDebouncer {
    pub const fn new() -> Self {
        Self {
            state: DebounceState::Released,
        }
    }

    /// Feed one raw sample.  Returns a button event once a level settles.
    pub fn sample(&mut self, pressed: bool, now_ms: u64) -> Option<Event> {
        match (self.state, pressed) {
            (DebounceState::Released, true) => {
                self.state = DebounceState::PressPending { since_ms: now_ms };
                None
            }
            (DebounceState::PressPending { .. }, false) => {
                self.state = DebounceState::Released;
                None
            }
            (DebounceState::PressPending { since_ms }, true) => {
                if now_ms.saturating_sub(since_ms) >= DEBOUNCE_MS {
                    self.state = DebounceState::Pressed;
                    Some(Event::ButtonPressDown)
                } else {
                    None
                }
            }
            (DebounceState::Pressed, false) => {
                self.state = DebounceState::ReleasePending { since_ms: now_ms };
                None
            }
            (DebounceState::ReleasePending { .. }, true) => {
                self.state = DebounceState::Pressed;
                None
            }
            (DebounceState::ReleasePending { since_ms }, false) => {
                if now_ms.saturating_sub(since_ms) >= DEBOUNCE_MS {
                    self.state = DebounceState::Released;
                    Some(Event::ButtonRelease)
                } else {
                    None
                }
            }
            (DebounceState::Released, false) | (DebounceState::Pressed, true) => None,
        }
    }

    /// [`sample`](Self::sample), queueing any resulting event.
    pub fn sample_into(&mut self, pressed: bool, now_ms: u64, queue: &mut EventQueue) {
        if let Some(event) = self.sample(pressed, now_ms) {
            queue.push(event);
        }
    }

    /// True once a press has been reported and not yet released.
    pub fn is_pressed(&self) -> bool {
        matches!(
            self.state,
            DebounceState::Pressed | DebounceState::ReleasePending { .. }
        )
    }
}
