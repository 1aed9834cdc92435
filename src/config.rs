//! Flash settings and on-device flash defaults.
//!
//! [`FlashSettings`] describes one burst of light (brightness + safety
//! timeout).  [`FlashDefaults`] is the pair the device uses when the user
//! triggers a flash from the physical button; the companion app sends its
//! own settings with every remote `Flash` command instead.
//!
//! Values can be overridden via the persistent store (see
//! [`NvsPersistence`](crate::adapters::nvs::NvsPersistence)).

use serde::{Deserialize, Serialize};

/// Milliseconds, as carried by the command protocol.
pub type Milliseconds = u16;

/// Brightness and timeout for a single flash of light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashSettings {
    /// Safety timeout after which the lights are forced off.
    pub timeout_ms: Milliseconds,
    /// Warm LED bank PWM (0 = off, 255 = full).
    pub warm: u8,
    /// Cool LED bank PWM (0 = off, 255 = full).
    pub cool: u8,
}

impl FlashSettings {
    /// Fallback for the regular (photo) flash when nothing is stored.
    pub const REGULAR_FALLBACK: Self = Self::new(5000, 127, 127);

    /// Fallback for the preflash (focus aid) when nothing is stored.
    pub const PREFLASH_FALLBACK: Self = Self::new(10000, 63, 63);

    /// All-zero settings: lights off.
    pub const OFF: Self = Self::new(0, 0, 0);

    pub const fn new(timeout_ms: Milliseconds, warm: u8, cool: u8) -> Self {
        Self {
            timeout_ms,
            warm,
            cool,
        }
    }

    /// True if applying these settings leaves the main lights lit.
    ///
    /// Both banks must be non-zero; a single-bank setting is treated as off
    /// for the purposes of the shutdown timer and status indicator.
    pub const fn lights_on(&self) -> bool {
        self.warm > 0 && self.cool > 0
    }

    /// True if no timeout has been configured.
    pub const fn is_unset(&self) -> bool {
        self.timeout_ms == 0
    }
}

/// Flash settings used for button-triggered flashes.
///
/// The preflash illuminates the scene while the camera focuses; the regular
/// flash is the burst used for the photo itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashDefaults {
    pub regular: FlashSettings,
    pub preflash: FlashSettings,
}

impl FlashDefaults {
    pub const fn new(regular: FlashSettings, preflash: FlashSettings) -> Self {
        Self { regular, preflash }
    }

    /// Replace any setting with an unset (zero) timeout by its built-in
    /// fallback.  The whole setting is replaced, not just the timeout.
    pub fn with_fallbacks(self) -> Self {
        let regular = if self.regular.is_unset() {
            FlashSettings::REGULAR_FALLBACK
        } else {
            self.regular
        };
        let preflash = if self.preflash.is_unset() {
            FlashSettings::PREFLASH_FALLBACK
        } else {
            self.preflash
        };
        Self { regular, preflash }
    }

    /// Copy with new regular settings.
    pub fn with_regular(self, regular: FlashSettings) -> Self {
        Self { regular, ..self }
    }
}
