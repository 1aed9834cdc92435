//! Outbound radio queues.
//!
//! The core sends commands and HID keys synchronously; the BLE stack
//! transmits them whenever the link allows.  [`RadioOutbox`] bridges the
//! two with bounded `embassy-sync` channels, without heap allocation.
//!
//! ```text
//! ┌──────────────┐  Command / key  ┌──────────────┐
//! │ FlashService │────────────────▶│  BLE task    │
//! │  (sync)      │   RadioOutbox   │  (notifies)  │
//! └──────────────┘                 └──────────────┘
//! ```
//!
//! The core runs on a single thread, so the channels use `NoopRawMutex`.
//! A full channel drops the message: the protocol has no retry, and a lost
//! trigger release is bounded by the shutdown timer.

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::ports::RadioPort;
use crate::protocol::Command;

/// Channel depth for outbound app commands.
const COMMAND_DEPTH: usize = 8;

/// Channel depth for outbound HID key codes.
const HID_KEY_DEPTH: usize = 8;

pub struct RadioOutbox {
    commands: Channel<NoopRawMutex, Command, COMMAND_DEPTH>,
    hid_keys: Channel<NoopRawMutex, u8, HID_KEY_DEPTH>,
    dropped: u32,
}

impl Default for RadioOutbox {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioOutbox {
    pub const fn new() -> Self {
        Self {
            commands: Channel::new(),
            hid_keys: Channel::new(),
            dropped: 0,
        }
    }

    /// Next command for the Nova characteristic, oldest first.
    pub fn next_command(&self) -> Option<Command> {
        self.commands.try_receive().ok()
    }

    /// Next key code for the HID report characteristic, oldest first.
    pub fn next_hid_key(&self) -> Option<u8> {
        self.hid_keys.try_receive().ok()
    }

    /// Messages lost to full channels since creation.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl RadioPort for RadioOutbox {
    fn send_app_command(&mut self, cmd: &Command) {
        if self.commands.try_send(*cmd).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            warn!("radio: command queue full, dropping {:?}", cmd);
        }
    }

    fn send_hid_key(&mut self, key_code: u8) {
        if self.hid_keys.try_send(key_code).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            warn!("radio: HID queue full, dropping key {:#04x}", key_code);
        }
    }
}
