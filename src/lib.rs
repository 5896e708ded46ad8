//! Client-side BLE protocol engine for the macOS `blued` daemon.
//!
//! Turns the daemon's loosely typed, opcode-tagged messages into typed
//! [`Event`]s, and turns central/peripheral commands into outgoing
//! messages, keeping a dual-indexed directory of everything discovered.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │  MemoryTransport   CaptureTransport   LogEventSink           │
//! │                                                              │
//! │  ────────────── Transport / EventSink ports ──────────────   │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  Session                                               │  │
//! │  │  Dispatcher ─▶ Directory ◀─ Central (commands)         │  │
//! │  │       └──────▶ EventBus ──▶ handlers(&mut Central)     │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```no_run
//! use blued_client::prelude::*;
//!
//! let mut session = Session::new(MemoryTransport::new(), SessionConfig::default());
//! session.on(EventKind::StateChange, |ev, central| {
//!     if *ev == Event::StateChange(AdapterState::PoweredOn) {
//!         let _ = central.start_scanning(&[], false);
//!     }
//! });
//! session.central_mut().init().unwrap();
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod beacon;
pub mod bus;
pub mod config;
pub mod directory;
pub mod error;
pub mod events;
pub mod gatt;
pub mod wire;

pub use error::{DecodeError, Error, Result};
pub use events::{AdapterState, Event, EventKind};

/// The types most callers need.
pub mod prelude {
    pub use crate::adapters::{CaptureTransport, LogEventSink, MemoryTransport};
    pub use crate::app::ports::{EventSink, sink_handler};
    pub use crate::app::{Central, Session, SessionHandle};
    pub use crate::beacon::{BeaconFormat, IBeacon};
    pub use crate::config::{DuplicatePolicy, SessionConfig};
    pub use crate::directory::{Advertisement, Directory, Peripheral};
    pub use crate::error::{Error, Result};
    pub use crate::events::{ALL_EVENTS, AdapterState, Event, EventKind};
    pub use crate::gatt::{
        GattUuid, LocalCharacteristic, LocalDescriptor, LocalService, Properties,
    };
    pub use crate::wire::{Inbound, Message, NullTransport, ProtocolRevision, Transport};
}
