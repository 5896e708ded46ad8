//! Named-event publish/subscribe.
//!
//! ```text
//!  Dispatcher ──emit──▶ ┌────────────┐ ──drain──▶ handler(kind) ──or──▶ wildcard
//!                       │ FIFO queue │
//!                       └────────────┘
//! ```
//!
//! One handler per [`EventKind`]; registering again replaces it. The
//! wildcard handler only sees events with no specific handler. Delivery is
//! strictly in emission order and never re-entrant: each handler returns
//! before the next event is taken off the queue.

use std::collections::{HashMap, VecDeque};

use log::info;

use crate::error::Result;
use crate::events::{ALL_EVENTS, Event, EventKind};

/// Event callback. `C` is the command surface handlers may drive.
pub type Handler<C> = Box<dyn FnMut(&Event, &mut C) + Send>;

pub struct EventBus<C> {
    handlers: HashMap<EventKind, Handler<C>>,
    wildcard: Option<Handler<C>>,
    queue: VecDeque<Event>,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            wildcard: None,
            queue: VecDeque::new(),
        }
    }
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `kind`, replacing any previous one.
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&Event, &mut C) + Send + 'static,
    {
        self.handlers.insert(kind, Box::new(handler));
    }

    /// Remove the handler for `kind`.
    pub fn off(&mut self, kind: EventKind) {
        self.handlers.remove(&kind);
    }

    /// Register the catch-all handler.
    pub fn on_all<F>(&mut self, handler: F)
    where
        F: FnMut(&Event, &mut C) + Send + 'static,
    {
        self.wildcard = Some(Box::new(handler));
    }

    pub fn off_all(&mut self) {
        self.wildcard = None;
    }

    /// Register by textual name; [`ALL_EVENTS`] selects the wildcard.
    pub fn on_named<F>(&mut self, name: &str, handler: F) -> Result<()>
    where
        F: FnMut(&Event, &mut C) + Send + 'static,
    {
        if name == ALL_EVENTS {
            self.on_all(handler);
        } else {
            self.on(name.parse()?, handler);
        }
        Ok(())
    }

    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind) || self.wildcard.is_some()
    }

    /// Queue an event. Never blocks.
    pub fn emit(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deliver every queued event in order. Returns how many were handled.
    pub fn drain(&mut self, ctx: &mut C) -> usize {
        let mut handled = 0;
        while let Some(event) = self.queue.pop_front() {
            let kind = event.kind();
            if let Some(handler) = self.handlers.get_mut(&kind) {
                handler(&event, ctx);
            } else if let Some(handler) = self.wildcard.as_mut() {
                handler(&event, ctx);
            } else {
                info!("bus: unhandled event {kind}");
                continue;
            }
            handled += 1;
        }
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::AdapterState;

    #[test]
    fn specific_handler_wins_over_wildcard() {
        let mut bus: EventBus<Vec<&'static str>> = EventBus::new();
        bus.on(EventKind::AdvertisingStart, |_, log| log.push("specific"));
        bus.on_all(|_, log| log.push("wildcard"));

        bus.emit(Event::AdvertisingStart);
        bus.emit(Event::AdvertisingStop);
        let mut log = Vec::new();
        assert_eq!(bus.drain(&mut log), 2);
        assert_eq!(log, ["specific", "wildcard"]);
    }

    #[test]
    fn reregistering_replaces() {
        let mut bus: EventBus<u32> = EventBus::new();
        bus.on(EventKind::AdvertisingStart, |_, n| *n += 1);
        bus.on(EventKind::AdvertisingStart, |_, n| *n += 10);
        bus.emit(Event::AdvertisingStart);
        let mut n = 0;
        bus.drain(&mut n);
        assert_eq!(n, 10);
    }

    #[test]
    fn off_unsubscribes_and_unhandled_is_not_counted() {
        let mut bus: EventBus<u32> = EventBus::new();
        bus.on(EventKind::AdvertisingStart, |_, n| *n += 1);
        bus.off(EventKind::AdvertisingStart);
        bus.emit(Event::AdvertisingStart);
        let mut n = 0;
        assert_eq!(bus.drain(&mut n), 0);
        assert_eq!(n, 0);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn delivery_is_fifo() {
        let mut bus: EventBus<Vec<AdapterState>> = EventBus::new();
        bus.on(EventKind::StateChange, |ev, seen| {
            if let Event::StateChange(s) = ev {
                seen.push(*s);
            }
        });
        for s in [AdapterState::Resetting, AdapterState::PoweredOff, AdapterState::PoweredOn] {
            bus.emit(Event::StateChange(s));
        }
        let mut seen = Vec::new();
        bus.drain(&mut seen);
        assert_eq!(
            seen,
            [AdapterState::Resetting, AdapterState::PoweredOff, AdapterState::PoweredOn]
        );
    }

    #[test]
    fn named_registration() {
        let mut bus: EventBus<u32> = EventBus::new();
        bus.on_named("advertisingStop", |_, n| *n += 1).unwrap();
        bus.on_named(ALL_EVENTS, |_, n| *n += 100).unwrap();
        assert!(bus.on_named("bogus", |_, _| {}).is_err());

        bus.emit(Event::AdvertisingStop);
        bus.emit(Event::AdvertisingStart);
        let mut n = 0;
        bus.drain(&mut n);
        assert_eq!(n, 101);
    }
}
