//! Flash service — the hexagonal core.
//!
//! [`FlashService`] owns the [`DeviceState`] and implements one handler per
//! inbound event.  All I/O flows through the platform ports passed into
//! each call, making the whole service testable with mock adapters.
//!
//! ```text
//!  Event ──▶ ┌───────────────────────────┐ ──▶ LightPort
//!            │       FlashService        │ ──▶ RadioPort
//!            │ DeviceState · trigger ack │ ──▶ TimerPort
//!            └───────────────────────────┘ ──▶ PersistencePort
//! ```
//!
//! ## Button trigger routing
//!
//! | Connected | Press down                    | Release                                  |
//! |-----------|-------------------------------|------------------------------------------|
//! | app       | preflash, `Trigger{pressed}`  | regular, `Trigger{released}`, await Ack  |
//! | hid only  | preflash                      | regular, volume-up key press + release   |
//! | neither   | preflash                      | lights off                               |
//!
//! ## Safety
//!
//! Whenever the lights are lit a shutdown timer is armed with the
//! timeout of the settings in use.  Every path that turns the lights off
//! cancels it first, and losing both radio channels turns the lights off.

use log::{debug, info, warn};

use crate::config::{FlashDefaults, FlashSettings};
use crate::counters::{CounterKind, Counters};
use crate::events::{Event, EventQueue};
use crate::protocol::{Command, CommandBody, CommandId, RawPayload};

use super::ports::Platform;
use super::state::DeviceState;

/// HID consumer key code sent to fire the phone's native camera.
pub const HID_KEY_VOLUME_UP: u8 = 0x20;

/// HID key code that releases the previously pressed key.
pub const HID_KEY_RELEASE: u8 = 0x00;

// ───────────────────────────────────────────────────────────────
// FlashService
// ───────────────────────────────────────────────────────────────

/// Event handlers for one Nova device.
#[derive(Debug, Default)]
pub struct FlashService {
    state: DeviceState,
}

impl FlashService {
    /// A service with all-zero state.  Call [`on_reset`](Self::on_reset)
    /// before anything else.
    pub const fn new() -> Self {
        Self {
            state: DeviceState::new(),
        }
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Run the handler for a single event.
    pub fn handle_event(&mut self, event: Event, hw: &mut impl Platform) {
        match event {
            Event::Reset => self.on_reset(hw),
            Event::AppConnect => self.on_app_connect(hw),
            Event::AppDisconnect => self.on_app_disconnect(hw),
            Event::HidConnect => self.on_hid_connect(hw),
            Event::HidDisconnect => self.on_hid_disconnect(hw),
            Event::ButtonPressDown => self.on_button_press_down(hw),
            Event::ButtonRelease => self.on_button_release(hw),
            Event::AppCommandReceived(cmd) => self.on_app_command(&cmd, hw),
            Event::TimerComplete => self.on_timer_complete(hw),
        }
    }

    /// Drain the queue, handling each event to completion before the next.
    pub fn run_pending(&mut self, queue: &mut EventQueue, hw: &mut impl Platform) {
        queue.drain(|event| self.handle_event(event, hw));
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Startup, or return to a known baseline.
    ///
    /// Reloads defaults and counters, counts the boot, turns the lights off
    /// and forgets both connections and any pending trigger.
    pub fn on_reset(&mut self, hw: &mut impl Platform) {
        self.state.flash_defaults = hw.load_flash_defaults().with_fallbacks();

        self.state.counters = hw.load_counters();
        self.bump(CounterKind::Boot, hw);

        self.flash_end(hw);

        self.state.app_connected = false;
        self.state.hid_connected = false;
        self.state.outbound_ids = Default::default();
        self.state.pending_trigger_ack = None;

        self.update_status_indicator(hw);
        info!(
            "reset: boot #{}, regular={:?}, preflash={:?}",
            self.state.counters.boot,
            self.state.flash_defaults.regular,
            self.state.flash_defaults.preflash
        );
    }

    // ── Radio subscriptions ───────────────────────────────────

    pub fn on_app_connect(&mut self, hw: &mut impl Platform) {
        self.state.app_connected = true;
        self.update_status_indicator(hw);
        self.bump(CounterKind::AppConnect, hw);
        info!("app connected");
    }

    pub fn on_app_disconnect(&mut self, hw: &mut impl Platform) {
        self.state.app_connected = false;
        self.update_status_indicator(hw);
        info!("app disconnected");
        self.end_flash_if_orphaned(hw);
    }

    pub fn on_hid_connect(&mut self, hw: &mut impl Platform) {
        self.state.hid_connected = true;
        self.update_status_indicator(hw);
        self.bump(CounterKind::HidConnect, hw);
        info!("hid connected");
    }

    pub fn on_hid_disconnect(&mut self, hw: &mut impl Platform) {
        self.state.hid_connected = false;
        self.update_status_indicator(hw);
        info!("hid disconnected");
        self.end_flash_if_orphaned(hw);
    }

    // ── Button ────────────────────────────────────────────────

    /// The debounced button went down: preflash and tell whoever is listening.
    pub fn on_button_press_down(&mut self, hw: &mut impl Platform) {
        self.flash_start(self.state.flash_defaults.preflash, hw);

        let kind = if self.state.app_connected {
            let cmd = Command::trigger(self.state.outbound_ids.next_id(), true);
            hw.send_app_command(&cmd);
            CounterKind::FlashButtonApp
        } else if self.state.hid_connected {
            CounterKind::FlashButtonNative
        } else {
            CounterKind::FlashButtonDisconnected
        };
        self.state.counters.increment(kind);
        hw.save_counters(&self.state.counters);
        debug!("button down, counted as {}", kind.name());
    }

    /// The debounced button came up: fire the photo.
    pub fn on_button_release(&mut self, hw: &mut impl Platform) {
        if self.state.app_connected {
            self.flash_start(self.state.flash_defaults.regular, hw);

            let cmd = Command::trigger(self.state.outbound_ids.next_id(), false);
            hw.send_app_command(&cmd);

            // The flash stays on until the app acks this id or the timer fires.
            self.state.pending_trigger_ack = Some(cmd.id);
            debug!("button up, awaiting ack {}", cmd.id);
        } else if self.state.hid_connected {
            self.flash_start(self.state.flash_defaults.regular, hw);

            hw.send_hid_key(HID_KEY_VOLUME_UP);
            hw.send_hid_key(HID_KEY_RELEASE);
            debug!("button up, native camera triggered");
        } else {
            self.flash_end(hw);
            debug!("button up, nothing connected");
        }
    }

    // ── App commands ──────────────────────────────────────────

    /// A command arrived from the app.  Every non-`Ack` is acknowledged,
    /// unless the app unsubscribed before the command was handled.
    pub fn on_app_command(&mut self, cmd: &Command, hw: &mut impl Platform) {
        let ack = Command::ack(cmd.id);

        match cmd.body {
            CommandBody::Ping => {
                self.reply(&ack, hw);
            }
            CommandBody::Flash(settings) => {
                self.flash_start(settings, hw);
                self.bump(CounterKind::FlashRemoteApp, hw);
                self.reply(&ack, hw);
                info!("remote flash {:?} (id {})", settings, cmd.id);
            }
            CommandBody::Off => {
                self.flash_end(hw);
                self.reply(&ack, hw);
            }
            CommandBody::Ack => {
                // Never ack an ack, or the two ends ping-pong forever.
                if self.state.pending_trigger_ack == Some(cmd.id) {
                    self.flash_end(hw);
                    self.state.pending_trigger_ack = None;
                    debug!("trigger {} acked, photo captured", cmd.id);
                }
            }
            CommandBody::Trigger { .. } => {
                // Triggers only flow device → app.  Still acknowledged so the
                // sender's exchange closes.
                warn!("unexpected trigger from app (id {})", cmd.id);
                self.reply(&ack, hw);
            }
        }
    }

    /// A command whose type tag has not been validated yet.
    ///
    /// Unknown or malformed commands are logged and dropped without any
    /// state change or reply.
    pub fn on_raw_app_command(
        &mut self,
        tag: u8,
        id: CommandId,
        payload: RawPayload,
        hw: &mut impl Platform,
    ) {
        match Command::from_parts(tag, id, payload) {
            Ok(cmd) => self.on_app_command(&cmd, hw),
            Err(e) => warn!("dropping app command id {}: {}", id, e),
        }
    }

    // ── Timer ─────────────────────────────────────────────────

    /// The shutdown timer ran out before anything turned the lights off.
    ///
    /// An expiry overtaken by a cancel or re-arm (it sat in the queue behind
    /// the event that did it) is ignored.
    pub fn on_timer_complete(&mut self, hw: &mut impl Platform) {
        if !hw.claim_expiry() {
            debug!("stale timer expiry ignored");
            return;
        }
        if let Some(id) = self.state.pending_trigger_ack.take() {
            warn!("trigger {} never acked, flash timed out", id);
        }
        self.flash_end(hw);
    }

    // ── Settings ──────────────────────────────────────────────

    /// Replace the button flash defaults and persist them.
    ///
    /// Zero timeouts get the built-in fallback, same as at reset.
    pub fn update_flash_defaults(&mut self, defaults: FlashDefaults, hw: &mut impl Platform) {
        self.state.flash_defaults = defaults.with_fallbacks();
        hw.save_flash_defaults(&self.state.flash_defaults);
        info!("flash defaults updated: {:?}", self.state.flash_defaults);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_app_connected(&self) -> bool {
        self.state.app_connected
    }

    pub fn is_hid_connected(&self) -> bool {
        self.state.hid_connected
    }

    pub fn is_lit(&self) -> bool {
        self.state.lit
    }

    pub fn pending_trigger_ack(&self) -> Option<CommandId> {
        self.state.pending_trigger_ack
    }

    pub fn counters(&self) -> &Counters {
        &self.state.counters
    }

    pub fn flash_defaults(&self) -> &FlashDefaults {
        &self.state.flash_defaults
    }

    /// Full state snapshot (diagnostics, tests).
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    // ── Internal ──────────────────────────────────────────────

    fn flash_start(&mut self, settings: FlashSettings, hw: &mut impl Platform) {
        hw.set_lights(settings.warm, settings.cool);
        self.state.lit = settings.lights_on();

        // Keep the status LED from tinting the photo.
        self.update_status_indicator(hw);

        // Only one shutdown timer may be outstanding.
        hw.cancel_timer();
        if self.state.lit {
            hw.schedule_timer(settings.timeout_ms);
        }
    }

    fn flash_end(&mut self, hw: &mut impl Platform) {
        hw.cancel_timer();
        hw.set_lights(0, 0);
        self.state.lit = false;
        self.update_status_indicator(hw);
    }

    fn end_flash_if_orphaned(&mut self, hw: &mut impl Platform) {
        if !self.state.any_connected() {
            self.flash_end(hw);
        }
    }

    fn reply(&self, ack: &Command, hw: &mut impl Platform) {
        if self.state.app_connected {
            hw.send_app_command(ack);
        } else {
            debug!("app gone, ack {} not sent", ack.id);
        }
    }

    fn update_status_indicator(&self, hw: &mut impl Platform) {
        hw.set_status_indicator(self.state.status_indicator());
    }

    fn bump(&mut self, kind: CounterKind, hw: &mut impl Platform) {
        self.state.counters.increment(kind);
        hw.save_counters(&self.state.counters);
    }
}
