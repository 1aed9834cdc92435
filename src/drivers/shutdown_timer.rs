//! One-shot software shutdown timer.
//!
//! Implements [`TimerPort`] on top of any [`Clock`].  The core arms it
//! whenever the lights come on; the main loop polls it and, on expiry,
//! pushes [`Event::TimerComplete`] into the same queue every other event
//! goes through, so expiry is handled run-to-completion like the rest.
//!
//! There is exactly one deadline.  Scheduling replaces it, cancelling
//! clears it, and a poll that finds it passed clears it before reporting,
//! so each arming produces at most one `TimerComplete`.
//!
//! A reported expiry stays claimable until the next schedule or cancel.
//! An event queued ahead of the `TimerComplete` that re-arms or cancels
//! the timer therefore turns the queued expiry into a no-op.

use log::debug;

use crate::app::ports::{Clock, TimerPort};
use crate::config::Milliseconds;
use crate::events::{Event, EventQueue};

pub struct ShutdownTimer<C: Clock> {
    clock: C,
    deadline_ms: Option<u64>,
    /// An expiry was reported and not yet claimed or superseded.
    expired: bool,
}

impl<C: Clock> ShutdownTimer<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            deadline_ms: None,
            expired: false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Milliseconds left before expiry, if armed.
    pub fn remaining_ms(&self) -> Option<u64> {
        self.deadline_ms
            .map(|deadline| deadline.saturating_sub(self.clock.now_ms()))
    }

    /// Check for expiry.  Returns `TimerComplete` once per arming.
    pub fn poll(&mut self) -> Option<Event> {
        let deadline = self.deadline_ms?;
        if self.clock.now_ms() >= deadline {
            self.deadline_ms = None;
            self.expired = true;
            debug!("shutdown timer expired");
            Some(Event::TimerComplete)
        } else {
            None
        }
    }

    /// [`poll`](Self::poll), queueing the expiry event.
    ///
    /// If the queue is full the deadline is kept, so the next poll retries.
    pub fn poll_into(&mut self, queue: &mut EventQueue) {
        let deadline = self.deadline_ms;
        if let Some(event) = self.poll() {
            if !queue.push(event) {
                self.deadline_ms = deadline;
                self.expired = false;
            }
        }
    }
}

impl<C: Clock> TimerPort for ShutdownTimer<C> {
    fn schedule_timer(&mut self, timeout_ms: Milliseconds) {
        let deadline = self.clock.now_ms() + u64::from(timeout_ms);
        self.deadline_ms = Some(deadline);
        self.expired = false;
    }

    fn cancel_timer(&mut self) {
        self.deadline_ms = None;
        self.expired = false;
    }

    fn claim_expiry(&mut self) -> bool {
        core::mem::take(&mut self.expired)
    }
}
