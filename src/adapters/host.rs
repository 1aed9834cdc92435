//! Composed platform for hosts and simulation.
//!
//! [`HostPlatform`] bundles one adapter per port into a single
//! [`Platform`](crate::app::ports::Platform): storage-backed persistence,
//! any [`LightPort`], the radio outbox and a software shutdown timer.
//! The owner's loop looks like:
//!
//! ```text
//! loop {
//!     debouncer.sample_into(pin_level, clock.now_ms(), &mut queue);
//!     service.run_pending(&mut queue, &mut platform);
//!     platform.poll_timer(&mut queue);
//!     service.run_pending(&mut queue, &mut platform);
//!     while let Some(cmd) = platform.radio().next_command() { /* notify */ }
//! }
//! ```
//!
//! Draining before the poll lets pending events re-arm the timer first.  An
//! expiry that still ends up behind a re-arm is stale and the service drops
//! it, see [`TimerPort::claim_expiry`].

use crate::app::ports::{
    Clock, LightPort, PersistencePort, RadioPort, StoragePort, TimerPort,
};
use crate::config::{FlashDefaults, Milliseconds};
use crate::counters::Counters;
use crate::drivers::shutdown_timer::ShutdownTimer;
use crate::events::EventQueue;
use crate::protocol::Command;

use super::nvs::NvsPersistence;
use super::radio::RadioOutbox;

pub struct HostPlatform<S: StoragePort, L: LightPort, C: Clock> {
    persistence: NvsPersistence<S>,
    lights: L,
    radio: RadioOutbox,
    timer: ShutdownTimer<C>,
}

impl<S, L, C> HostPlatform<S, L, C>
where
    S: StoragePort,
    L: LightPort,
    C: Clock,
{
    pub fn new(storage: S, lights: L, clock: C) -> Self {
        Self {
            persistence: NvsPersistence::new(storage),
            lights,
            radio: RadioOutbox::new(),
            timer: ShutdownTimer::new(clock),
        }
    }

    /// Queue `TimerComplete` if the shutdown deadline has passed.
    pub fn poll_timer(&mut self, queue: &mut EventQueue) {
        self.timer.poll_into(queue);
    }

    pub fn persistence(&self) -> &NvsPersistence<S> {
        &self.persistence
    }

    pub fn lights(&self) -> &L {
        &self.lights
    }

    pub fn radio(&self) -> &RadioOutbox {
        &self.radio
    }

    pub fn timer(&self) -> &ShutdownTimer<C> {
        &self.timer
    }

    /// Take the storage back, e.g. to simulate a power cycle.
    pub fn into_storage(self) -> S {
        self.persistence.into_storage()
    }
}

impl<S: StoragePort, L: LightPort, C: Clock> PersistencePort for HostPlatform<S, L, C> {
    fn load_counters(&mut self) -> Counters {
        self.persistence.load_counters()
    }

    fn save_counters(&mut self, counters: &Counters) {
        self.persistence.save_counters(counters);
    }

    fn load_flash_defaults(&mut self) -> FlashDefaults {
        self.persistence.load_flash_defaults()
    }

    fn save_flash_defaults(&mut self, defaults: &FlashDefaults) {
        self.persistence.save_flash_defaults(defaults);
    }
}

impl<S: StoragePort, L: LightPort, C: Clock> RadioPort for HostPlatform<S, L, C> {
    fn send_app_command(&mut self, cmd: &Command) {
        self.radio.send_app_command(cmd);
    }

    fn send_hid_key(&mut self, key_code: u8) {
        self.radio.send_hid_key(key_code);
    }
}

impl<S: StoragePort, L: LightPort, C: Clock> LightPort for HostPlatform<S, L, C> {
    fn set_status_indicator(&mut self, lit: bool) {
        self.lights.set_status_indicator(lit);
    }

    fn set_lights(&mut self, warm: u8, cool: u8) {
        self.lights.set_lights(warm, cool);
    }
}

impl<S: StoragePort, L: LightPort, C: Clock> TimerPort for HostPlatform<S, L, C> {
    fn schedule_timer(&mut self, timeout_ms: Milliseconds) {
        self.timer.schedule_timer(timeout_ms);
    }

    fn cancel_timer(&mut self) {
        self.timer.cancel_timer();
    }

    fn claim_expiry(&mut self) -> bool {
        self.timer.claim_expiry()
    }
}
