//! Hook tracing adapter.
//!
//! [`TracedPlatform`] wraps any [`Platform`] and writes one structured log
//! line per hook call before forwarding it.  Useful on the bench and in
//! simulation; on the device the wrapper is simply left out.

use log::debug;

use crate::app::ports::{LightPort, PersistencePort, RadioPort, TimerPort};
use crate::config::{FlashDefaults, Milliseconds};
use crate::counters::Counters;
use crate::protocol::Command;

pub struct TracedPlatform<P> {
    inner: P,
}

impl<P> TracedPlatform<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: PersistencePort> PersistencePort for TracedPlatform<P> {
    fn load_counters(&mut self) -> Counters {
        let counters = self.inner.load_counters();
        debug!("STORE | load counters -> boot={}", counters.boot);
        counters
    }

    fn save_counters(&mut self, counters: &Counters) {
        debug!("STORE | save counters {:?}", counters);
        self.inner.save_counters(counters);
    }

    fn load_flash_defaults(&mut self) -> FlashDefaults {
        let defaults = self.inner.load_flash_defaults();
        debug!("STORE | load flash defaults -> {:?}", defaults);
        defaults
    }

    fn save_flash_defaults(&mut self, defaults: &FlashDefaults) {
        debug!("STORE | save flash defaults {:?}", defaults);
        self.inner.save_flash_defaults(defaults);
    }
}

impl<P: RadioPort> RadioPort for TracedPlatform<P> {
    fn send_app_command(&mut self, cmd: &Command) {
        debug!("RADIO | app <- {:?} id={}", cmd.command_type(), cmd.id);
        self.inner.send_app_command(cmd);
    }

    fn send_hid_key(&mut self, key_code: u8) {
        debug!("RADIO | hid <- key {:#04x}", key_code);
        self.inner.send_hid_key(key_code);
    }
}

impl<P: LightPort> LightPort for TracedPlatform<P> {
    fn set_status_indicator(&mut self, lit: bool) {
        debug!("LIGHT | indicator {}", if lit { "on" } else { "off" });
        self.inner.set_status_indicator(lit);
    }

    fn set_lights(&mut self, warm: u8, cool: u8) {
        debug!("LIGHT | warm={} cool={}", warm, cool);
        self.inner.set_lights(warm, cool);
    }
}

impl<P: TimerPort> TimerPort for TracedPlatform<P> {
    fn schedule_timer(&mut self, timeout_ms: Milliseconds) {
        debug!("TIMER | schedule {}ms", timeout_ms);
        self.inner.schedule_timer(timeout_ms);
    }

    fn cancel_timer(&mut self) {
        debug!("TIMER | cancel");
        self.inner.cancel_timer();
    }

    fn claim_expiry(&mut self) -> bool {
        let current = self.inner.claim_expiry();
        debug!("TIMER | expiry {}", if current { "claimed" } else { "stale" });
        current
    }
}
