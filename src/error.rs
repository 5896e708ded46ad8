//! Unified error types for the blued client.
//!
//! A single crate-level [`Error`] that every subsystem converts into, plus
//! [`DecodeError`] for malformed daemon messages. None of these are fatal:
//! the session logs them and carries on with the next message.

use thiserror::Error;
use uuid::Uuid;

use crate::wire::opcode::InboundKind;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Error)]
pub enum Error {
    /// A command targeted a peripheral the session has never discovered.
    #[error("no peripheral {0}")]
    UnknownPeripheral(Uuid),

    /// A command named a service the peripheral has not reported.
    #[error("peripheral {peripheral} has no service {service}")]
    UnknownService { peripheral: Uuid, service: String },

    /// A command named a characteristic the service has not reported.
    #[error("service {service} on {peripheral} has no characteristic {characteristic}")]
    UnknownCharacteristic {
        peripheral: Uuid,
        service: String,
        characteristic: String,
    },

    /// A caller-supplied UUID string could not be parsed.
    #[error("invalid UUID {0:?}")]
    InvalidUuid(String),

    /// An event name did not match any known event.
    #[error("unknown event {0:?}")]
    UnknownEvent(String),

    /// An inbound message did not have the expected shape.
    #[error("malformed message: {0}")]
    Decode(#[from] DecodeError),

    /// The transport refused or failed to deliver an outgoing message.
    #[error("transport: {0}")]
    Transport(String),

    /// A capture file line was not a valid record.
    #[error("capture line {line}: {source}")]
    Capture {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Raised while pulling typed fields out of a generic wire message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A required key is absent.
    #[error("missing argument {0}")]
    MissingArgument(&'static str),

    /// The key is present but holds another kind of value.
    #[error("argument {key} is not {expected}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },

    /// Attribute UUID bytes were not 2, 4 or 16 bytes long.
    #[error("UUID of {0} bytes")]
    UuidLength(usize),

    /// A handle or other bounded integer did not fit its range.
    #[error("argument {key} out of range: {value}")]
    OutOfRange { key: &'static str, value: i64 },

    /// An iBeacon payload or manufacturer frame had the wrong layout.
    #[error("bad beacon payload: {0}")]
    Beacon(&'static str),

    /// Recorded while dispatching a message of a known kind.
    #[error("{kind:?}: {source}")]
    In {
        kind: InboundKind,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Tag this error with the inbound message kind that produced it.
    pub fn within(self, kind: InboundKind) -> Self {
        Self::In {
            kind,
            source: Box::new(self),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
