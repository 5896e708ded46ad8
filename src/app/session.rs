//! Session: the single context object tying the engine together.
//!
//! ```text
//!  Inbound ──▶ Dispatcher ──▶ Directory (in Central)
//!                  │
//!                  ▼
//!              EventBus ──drain──▶ handlers(&Event, &mut Central) ──▶ Transport
//! ```
//!
//! Every inbound message is dispatched and its event fully delivered before
//! the next message is looked at.

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use crate::bus::EventBus;
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::events::{Event, EventKind};
use crate::wire::{Inbound, Message, Transport};

use super::central::Central;
use super::dispatcher::Dispatcher;

pub struct Session<T> {
    central: Central<T>,
    bus: EventBus<Central<T>>,
    dispatcher: Dispatcher,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, config: SessionConfig) -> Self {
        let dispatcher = Dispatcher::new(config.revision, config.duplicate_policy);
        Self {
            central: Central::new(transport, config),
            bus: EventBus::new(),
            dispatcher,
        }
    }

    pub fn central(&self) -> &Central<T> {
        &self.central
    }

    pub fn central_mut(&mut self) -> &mut Central<T> {
        &mut self.central
    }

    pub fn bus_mut(&mut self) -> &mut EventBus<Central<T>> {
        &mut self.bus
    }

    pub fn into_central(self) -> Central<T> {
        self.central
    }

    /// Shorthand for [`EventBus::on`].
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&Event, &mut Central<T>) + Send + 'static,
    {
        self.bus.on(kind, handler);
    }

    /// Shorthand for [`EventBus::on_all`].
    pub fn on_all<F>(&mut self, handler: F)
    where
        F: FnMut(&Event, &mut Central<T>) + Send + 'static,
    {
        self.bus.on_all(handler);
    }

    /// Process one delivery from the transport to completion.
    ///
    /// A malformed message is logged and returned as an error; the session
    /// stays usable.
    pub fn handle(&mut self, inbound: Inbound) -> Result<()> {
        match inbound {
            Inbound::Message(m) => self.handle_message(&m),
            Inbound::Fault(fault) => {
                warn!("session: {fault}");
                self.bus.emit(Event::ConnectionFault(fault));
                self.bus.drain(&mut self.central);
                Ok(())
            }
        }
    }

    pub fn handle_message(&mut self, message: &Message) -> Result<()> {
        if self.central.config().verbose {
            info!("recv: {} {:?}", message.id, message.args);
        } else {
            debug!("recv: {}", message.id);
        }

        let allow_duplicates = self.central.allow_duplicates;
        match self
            .dispatcher
            .dispatch(message, &mut self.central.directory, allow_duplicates)
        {
            Ok(Some(event)) => self.bus.emit(event),
            Ok(None) => {}
            Err(e) => {
                warn!("session: dropping message {}: {e}", message.id);
                return Err(e.into());
            }
        }
        self.bus.drain(&mut self.central);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Worker thread
// ───────────────────────────────────────────────────────────────

/// Handle to a session running on its own thread.
pub struct SessionHandle<T> {
    tx: Sender<Inbound>,
    worker: JoinHandle<Session<T>>,
}

impl<T: Transport + Send + 'static> Session<T> {
    /// Move the session onto a worker thread fed by an unbounded channel.
    ///
    /// The transport's delivery thread only ever enqueues, so it never waits
    /// on a handler.
    pub fn spawn(self) -> SessionHandle<T> {
        let (tx, rx) = mpsc::channel::<Inbound>();
        let worker = thread::spawn(move || {
            let mut session = self;
            for inbound in rx {
                // Already logged by handle().
                let _ = session.handle(inbound);
            }
            debug!("session: inbound channel closed");
            session
        });
        SessionHandle { tx, worker }
    }
}

impl<T> SessionHandle<T> {
    /// Cloneable sender for the transport's delivery side.
    pub fn sender(&self) -> Sender<Inbound> {
        self.tx.clone()
    }

    pub fn deliver(&self, inbound: impl Into<Inbound>) -> Result<()> {
        self.tx
            .send(inbound.into())
            .map_err(|_| Error::Transport("session worker stopped".into()))
    }

    /// Close the channel, wait for queued deliveries, and recover the session.
    ///
    /// Outstanding clones from [`sender`](Self::sender) must be dropped first.
    pub fn join(self) -> Result<Session<T>> {
        drop(self.tx);
        self.worker
            .join()
            .map_err(|_| Error::Transport("session worker panicked".into()))
    }
}
