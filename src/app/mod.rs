//! Application core: the protocol engine proper, zero I/O.
//!
//! The dispatcher, the command encoder and the session that ties them to a
//! [`Transport`](ports::Transport) live here. All interaction with the daemon
//! and with event consumers happens through the traits in [`ports`].

pub mod central;
pub mod commands;
pub mod dispatcher;
pub mod ports;
pub mod session;

pub use central::Central;
pub use dispatcher::Dispatcher;
pub use session::{Session, SessionHandle};
