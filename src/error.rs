//! Unified error types for the adapters around the Nova core.
//!
//! The event handlers themselves never fail.  Errors only exist at the
//! boundary: decoding commands and talking to storage.
//! Every boundary error converts into [`Error`].  All variants are `Copy`
//! so they can be logged and passed around without allocation.

use core::fmt;

pub use crate::app::ports::StorageError;
pub use crate::protocol::ProtocolError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A received message could not be turned into a command.
    Protocol(ProtocolError),
    /// Persistent storage failed.
    Storage(StorageError),
    /// A stored record could not be decoded.
    Corrupted(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protocol(e) => write!(f, "protocol: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Corrupted(what) => write!(f, "corrupted: {what}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
