//! Device state owned by the flash service.
//!
//! `DeviceState` is the single record every event handler reads from and
//! writes to.  It is created zeroed at startup and rebuilt by the reset
//! handler; nothing outside [`FlashService`](super::service::FlashService)
//! mutates it.

use crate::config::{FlashDefaults, FlashSettings};
use crate::counters::Counters;
use crate::protocol::{CommandId, CommandIdAllocator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceState {
    /// Settings for button-triggered flashes.
    pub flash_defaults: FlashDefaults,
    /// Usage counters.  Saved after each modification.
    pub counters: Counters,
    /// App subscribed to the Nova characteristic.
    pub app_connected: bool,
    /// Phone subscribed to the HID characteristic.
    pub hid_connected: bool,
    /// Main lights currently lit.
    pub lit: bool,
    /// Outbound command ids.
    pub outbound_ids: CommandIdAllocator,
    /// Id of the trigger-release command whose `Ack` ends the flash.
    pub pending_trigger_ack: Option<CommandId>,
}

impl DeviceState {
    pub const fn new() -> Self {
        Self {
            flash_defaults: FlashDefaults::new(FlashSettings::OFF, FlashSettings::OFF),
            counters: Counters::ZERO,
            app_connected: false,
            hid_connected: false,
            lit: false,
            outbound_ids: CommandIdAllocator::new(),
            pending_trigger_ack: None,
        }
    }

    /// Either radio channel is subscribed.
    pub const fn any_connected(&self) -> bool {
        self.app_connected || self.hid_connected
    }

    /// The status indicator shows "ready": connected and not flashing.
    pub const fn status_indicator(&self) -> bool {
        self.any_connected() && !self.lit
    }
}
