//! Transport abstraction: anything that can carry daemon messages.
//!
//! Concrete implementations live in `crate::adapters`:
//! - in-memory recorder (tests, embedding)
//! - JSON-lines capture writer (CLI, replay)
//!
//! The session is generic over `Transport`, so a real IPC link to the
//! daemon plugs in without touching the protocol engine.

use core::fmt;

use super::message::Message;

/// Outbound half of a daemon link.
pub trait Transport {
    /// Error type for this transport.
    type Error: fmt::Display;

    /// Hand one fully-encoded message to the daemon.
    fn send(&mut self, message: &Message) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn send(&mut self, message: &Message) -> Result<(), Self::Error> {
        (**self).send(message)
    }
}

/// A transport that discards every message.
/// Useful when only the inbound side is being exercised.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = core::convert::Infallible;

    fn send(&mut self, _message: &Message) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Link-level advisories surfaced to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFault {
    /// The daemon rejected a message as malformed.
    Invalid,
    /// The link dropped; the daemon may come back.
    Interrupted,
    /// The link is gone for good.
    Terminated,
    Other(String),
}

impl fmt::Display for TransportFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => f.write_str("connection invalid"),
            Self::Interrupted => f.write_str("connection interrupted"),
            Self::Terminated => f.write_str("connection terminated"),
            Self::Other(reason) => write!(f, "connection error: {reason}"),
        }
    }
}

/// Everything the transport can deliver to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Message(Message),
    Fault(TransportFault),
}

impl From<Message> for Inbound {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}

impl From<TransportFault> for Inbound {
    fn from(fault: TransportFault) -> Self {
        Self::Fault(fault)
    }
}
