//! Command protocol spoken with the companion app.
//!
//! Every command carries a numeric id.  The receiver of any non-`Ack`
//! command answers with exactly one `Ack` carrying the same id; an `Ack` is
//! never itself acknowledged.
//!
//! ```text
//!   Device                           App
//!     │── Trigger{pressed}  id=1 ──▶ │
//!     │◀────────────── Ack  id=1 ─── │
//!     │── Trigger{released} id=2 ──▶ │   (flash held until Ack 2)
//!     │◀────────────── Ack  id=2 ─── │   photo captured → lights off
//!     │◀── Flash{settings}  id=9 ─── │
//!     │── Ack               id=9 ──▶ │
//! ```
//!
//! Byte layout on the air is the codec's business; this module only fixes
//! the logical schema the codec must preserve.

use core::fmt;

use crate::config::FlashSettings;

/// Correlation id shared by a request and its `Ack`.
pub type CommandId = u16;

/// Command type tag, with its numeric value on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandType {
    /// Acknowledges the command with the same id.
    Ack = 0,
    /// No-op; used by the app to test connectivity.
    Ping = 1,
    /// App → device: light up with the given settings.
    Flash = 2,
    /// App → device: lights off.
    Off = 3,
    /// Device → app: the physical button was pressed or released.
    Trigger = 4,
}

impl TryFrom<u8> for CommandType {
    type Error = ProtocolError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Ack),
            1 => Ok(Self::Ping),
            2 => Ok(Self::Flash),
            3 => Ok(Self::Off),
            4 => Ok(Self::Trigger),
            other => Err(ProtocolError::UnknownCommandType(other)),
        }
    }
}

/// Type-specific payload.  Only `Flash` and `Trigger` carry data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandBody {
    Ack,
    Ping,
    Flash(FlashSettings),
    Off,
    Trigger { is_pressed: bool },
}

/// A single protocol message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub id: CommandId,
    pub body: CommandBody,
}

impl Command {
    pub const fn ack(id: CommandId) -> Self {
        Self {
            id,
            body: CommandBody::Ack,
        }
    }

    pub const fn ping(id: CommandId) -> Self {
        Self {
            id,
            body: CommandBody::Ping,
        }
    }

    pub const fn flash(id: CommandId, settings: FlashSettings) -> Self {
        Self {
            id,
            body: CommandBody::Flash(settings),
        }
    }

    pub const fn off(id: CommandId) -> Self {
        Self {
            id,
            body: CommandBody::Off,
        }
    }

    pub const fn trigger(id: CommandId, is_pressed: bool) -> Self {
        Self {
            id,
            body: CommandBody::Trigger { is_pressed },
        }
    }

    /// Build a command from its decoded parts.
    ///
    /// `Flash` and `Trigger` need the matching payload; the payload of the
    /// other types is ignored.
    pub fn from_parts(tag: u8, id: CommandId, payload: RawPayload) -> Result<Self, ProtocolError> {
        let kind = CommandType::try_from(tag)?;
        let body = match (kind, payload) {
            (CommandType::Ack, _) => CommandBody::Ack,
            (CommandType::Ping, _) => CommandBody::Ping,
            (CommandType::Off, _) => CommandBody::Off,
            (CommandType::Flash, RawPayload::Flash(settings)) => CommandBody::Flash(settings),
            (CommandType::Trigger, RawPayload::Trigger(is_pressed)) => {
                CommandBody::Trigger { is_pressed }
            }
            (kind, _) => return Err(ProtocolError::MissingBody(kind)),
        };
        Ok(Self { id, body })
    }

    pub const fn command_type(&self) -> CommandType {
        match self.body {
            CommandBody::Ack => CommandType::Ack,
            CommandBody::Ping => CommandType::Ping,
            CommandBody::Flash(_) => CommandType::Flash,
            CommandBody::Off => CommandType::Off,
            CommandBody::Trigger { .. } => CommandType::Trigger,
        }
    }

    pub const fn is_ack(&self) -> bool {
        matches!(self.body, CommandBody::Ack)
    }

    /// The `Ack` this command expects in return.  `None` for an `Ack`.
    pub const fn expected_ack(&self) -> Option<Command> {
        if self.is_ack() {
            None
        } else {
            Some(Command::ack(self.id))
        }
    }
}

/// Payload as handed over by a codec, before the type tag is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPayload {
    None,
    Flash(FlashSettings),
    Trigger(bool),
}

/// Source of unique outbound ids.
///
/// Ids start at 1 and increase by one per command.  Zero is skipped on
/// wrap-around so it never appears on the wire from this side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandIdAllocator {
    last: CommandId,
}

impl CommandIdAllocator {
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    pub fn next_id(&mut self) -> CommandId {
        self.last = match self.last.wrapping_add(1) {
            0 => 1,
            id => id,
        };
        self.last
    }
}

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

/// Reasons a decoded message cannot become a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// The type tag is not one of the known [`CommandType`]s.
    UnknownCommandType(u8),
    /// A `Flash` or `Trigger` arrived without its payload.
    MissingBody(CommandType),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommandType(tag) => write!(f, "unknown command type {tag}"),
            Self::MissingBody(kind) => write!(f, "{kind:?} command without body"),
        }
    }
}
