//! Wire model shared by the inbound and outbound paths.
//!
//! - [`value`]: loosely typed nested dictionary with typed accessors
//! - [`message`]: the opcode-tagged envelope and argument keys
//! - [`opcode`]: outbound ids and the versioned inbound table
//! - [`transport`]: the port the session sends through

pub mod message;
pub mod opcode;
pub mod transport;
pub mod value;

pub use message::{Message, keys};
pub use opcode::{InboundKind, Outbound, ProtocolRevision};
pub use transport::{Inbound, NullTransport, Transport, TransportFault};
pub use value::{Dict, Value};
