//! Usage counters.
//!
//! Diagnostic stats incremented as the device is used and persisted after
//! every change.  The app may read them back for support purposes.
//!
//! ## Persisted layout
//!
//! ```text
//! offset  field
//! ──────  ─────────────────────────
//!    0    boot
//!    4    app_connect
//!    8    hid_connect
//!   12    flash_button_app
//!   16    flash_button_native
//!   20    flash_button_disconnected
//!   24    flash_remote_app
//! ```
//!
//! Every field is a little-endian `u32` at a fixed offset.  The record is
//! append-only: new counters go at the end, existing fields are never
//! removed or reordered, so blobs written by older firmware still decode.

/// Identifies one counter field.  Declaration order is the persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CounterKind {
    /// Device started (reset handled).
    Boot = 0,
    /// Companion app subscribed to the Nova characteristic.
    AppConnect = 1,
    /// Phone subscribed to the HID characteristic.
    HidConnect = 2,
    /// Button flash while paired to the companion app.
    FlashButtonApp = 3,
    /// Button flash while paired over native HID.
    FlashButtonNative = 4,
    /// Button flash with nothing connected.
    FlashButtonDisconnected = 5,
    /// Flash requested remotely by the companion app.
    FlashRemoteApp = 6,
}

impl CounterKind {
    pub const COUNT: usize = 7;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Boot,
        Self::AppConnect,
        Self::HidConnect,
        Self::FlashButtonApp,
        Self::FlashButtonNative,
        Self::FlashButtonDisconnected,
        Self::FlashRemoteApp,
    ];

    /// Byte offset of this field in the persisted record.
    pub const fn offset(self) -> usize {
        self as usize * 4
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Boot => "boot",
            Self::AppConnect => "app_connect",
            Self::HidConnect => "hid_connect",
            Self::FlashButtonApp => "flash_button_app",
            Self::FlashButtonNative => "flash_button_native",
            Self::FlashButtonDisconnected => "flash_button_disconnected",
            Self::FlashRemoteApp => "flash_remote_app",
        }
    }
}

/// The full counters record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub boot: u32,
    pub app_connect: u32,
    pub hid_connect: u32,
    pub flash_button_app: u32,
    pub flash_button_native: u32,
    pub flash_button_disconnected: u32,
    pub flash_remote_app: u32,
}

impl Counters {
    /// Size of the persisted record written by this firmware.
    pub const ENCODED_LEN: usize = CounterKind::COUNT * 4;

    pub const ZERO: Self = Self {
        boot: 0,
        app_connect: 0,
        hid_connect: 0,
        flash_button_app: 0,
        flash_button_native: 0,
        flash_button_disconnected: 0,
        flash_remote_app: 0,
    };

    pub fn get(&self, kind: CounterKind) -> u32 {
        *self.field(kind)
    }

    /// Increment one counter.  Wraps rather than panicking on overflow.
    pub fn increment(&mut self, kind: CounterKind) {
        let field = self.field_mut(kind);
        *field = field.wrapping_add(1);
    }

    /// Encode into the fixed-offset persisted layout.
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        for kind in CounterKind::ALL {
            let off = kind.offset();
            out[off..off + 4].copy_from_slice(&self.get(kind).to_le_bytes());
        }
        out
    }

    /// Decode a persisted record.
    ///
    /// Fields past the end of `bytes` (a blob from older firmware) read as
    /// zero.  Bytes past the last known field (newer firmware) are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut counters = Self::default();
        for kind in CounterKind::ALL {
            let off = kind.offset();
            if let Some(chunk) = bytes.get(off..off + 4) {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(chunk);
                *counters.field_mut(kind) = u32::from_le_bytes(raw);
            }
        }
        counters
    }

    fn field(&self, kind: CounterKind) -> &u32 {
        match kind {
            CounterKind::Boot => &self.boot,
            CounterKind::AppConnect => &self.app_connect,
            CounterKind::HidConnect => &self.hid_connect,
            CounterKind::FlashButtonApp => &self.flash_button_app,
            CounterKind::FlashButtonNative => &self.flash_button_native,
            CounterKind::FlashButtonDisconnected => &self.flash_button_disconnected,
            CounterKind::FlashRemoteApp => &self.flash_remote_app,
        }
    }

    fn field_mut(&mut self, kind: CounterKind) -> &mut u32 {
        match kind {
            CounterKind::Boot => &mut self.boot,
            CounterKind::AppConnect => &mut self.app_connect,
            CounterKind::HidConnect => &mut self.hid_connect,
            CounterKind::FlashButtonApp => &mut self.flash_button_app,
            CounterKind::FlashButtonNative => &mut self.flash_button_native,
            CounterKind::FlashButtonDisconnected => &mut self.flash_button_disconnected,
            CounterKind::FlashRemoteApp => &mut self.flash_remote_app,
        }
    }
}
