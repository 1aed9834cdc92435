//! Port traits — the hexagonal boundary between the flash core and the platform.
//!
//! ```text
//!   FlashService (domain) ──▶ Port trait ──▶ Adapter ──▶ hardware / radio / flash
//! ```
//!
//! Every hook the core needs is one method here.  Hooks are synchronous
//! and infallible from the core's point of view: a radio send or a save
//! that fails is the adapter's problem to log or retry.  The handlers take
//! the platform as `&mut impl Platform`, so any per-device context an
//! implementation needs lives in the implementing type itself.

use crate::config::{FlashDefaults, Milliseconds};
use crate::counters::Counters;
use crate::protocol::Command;

// ───────────────────────────────────────────────────────────────
// Persistence port (domain ↔ non-volatile memory)
// ───────────────────────────────────────────────────────────────

/// Load and save the records that survive power cycles.
pub trait PersistencePort {
    /// Last saved counters, or an all-zero record if none exist.
    fn load_counters(&mut self) -> Counters;

    /// Persist counters.  Called after every increment.
    fn save_counters(&mut self, counters: &Counters);

    /// Last saved flash defaults, or an all-zero record if none exist.
    ///
    /// Zero timeouts are replaced with built-in fallbacks by the core.
    fn load_flash_defaults(&mut self) -> FlashDefaults;

    /// Persist flash defaults after an explicit update.
    fn save_flash_defaults(&mut self, defaults: &FlashDefaults);
}

// ───────────────────────────────────────────────────────────────
// Radio port (domain → BLE stack)
// ───────────────────────────────────────────────────────────────

/// Outbound radio traffic.
pub trait RadioPort {
    /// Send a command to the companion app.
    ///
    /// Only called while the app channel is marked connected.
    fn send_app_command(&mut self, cmd: &Command);

    /// Send one HID key code to the paired phone.
    ///
    /// Only called while the HID channel is marked connected.
    fn send_hid_key(&mut self, key_code: u8);
}

// ───────────────────────────────────────────────────────────────
// Light port (domain → LED drivers)
// ───────────────────────────────────────────────────────────────

pub trait LightPort {
    /// Set the single "ready" indicator LED.
    fn set_status_indicator(&mut self, lit: bool);

    /// Drive the main light banks (0 = off, 255 = full).
    fn set_lights(&mut self, warm: u8, cool: u8);
}

// ───────────────────────────────────────────────────────────────
// Timer port (domain → shutdown timer)
// ───────────────────────────────────────────────────────────────

/// The single shutdown timer.
///
/// The core always cancels before scheduling, so at most one timer is
/// outstanding.  On expiry the implementation must deliver
/// [`Event::TimerComplete`](crate::events::Event::TimerComplete) back into
/// the event queue rather than calling into the core directly.
///
/// A queued expiry can go stale: events ahead of it may cancel or re-arm
/// the timer before it is handled.  Cancellation must still win, so the
/// core confirms every `TimerComplete` through [`claim_expiry`](Self::claim_expiry).
pub trait TimerPort {
    fn schedule_timer(&mut self, timeout_ms: Milliseconds);

    /// Disarm the timer.  No-op if nothing is scheduled.
    fn cancel_timer(&mut self);

    /// Consume a reported expiry.
    ///
    /// Returns `true` only if an expiry was reported and neither
    /// [`schedule_timer`](Self::schedule_timer) nor
    /// [`cancel_timer`](Self::cancel_timer) has been called since.
    fn claim_expiry(&mut self) -> bool;
}

/// Everything the core needs from a device.
pub trait Platform: PersistencePort + RadioPort + LightPort + TimerPort {}

impl<T> Platform for T where T: PersistencePort + RadioPort + LightPort + TimerPort {}

// ───────────────────────────────────────────────────────────────
// Adapter-side ports
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage (NVS, files, in-memory).
///
/// Used by [`NvsPersistence`](crate::adapters::nvs::NvsPersistence) to
/// implement [`PersistencePort`].  Writes MUST be atomic per key so a
/// power loss never leaves a half-written counters record.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> StorageResult<usize>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> StorageResult<()>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> StorageResult<()>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

/// Monotonic millisecond clock for software timers and debouncing.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

pub type StorageResult<T> = Result<T, StorageError>;

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
