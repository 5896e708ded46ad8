//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements | Connects to                     |
//! |------------|------------|---------------------------------|
//! | `memory`   | Transport  | In-memory message recorder      |
//! | `capture`  | Transport  | JSON-lines writer (and reader)  |
//! | `log_sink` | EventSink  | `log` facade                    |
//!
//! [`NullTransport`](crate::wire::NullTransport) lives with the trait.

pub mod capture;
pub mod log_sink;
pub mod memory;

pub use capture::{CaptureTransport, read_capture};
pub use log_sink::LogEventSink;
pub use memory::MemoryTransport;
