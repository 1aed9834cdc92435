//! Monotonic time adapter.
//!
//! [`SystemClock`] implements the [`Clock`] port with `std::time::Instant`,
//! counting from construction.  On the device the same port is backed by
//! the high-resolution hardware timer.

use std::time::Instant;

use crate::app::ports::Clock;

pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
