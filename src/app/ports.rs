//! Port traits: the boundary between the protocol engine and the outside.
//!
//! ```text
//!   Transport ──▶ Session (engine) ──▶ EventSink
//! ```
//!
//! The daemon link implements [`Transport`]; anything that wants a passive
//! view of the event stream (logs, recorders) implements [`EventSink`] and
//! is installed on the bus through [`sink_handler`].

pub use crate::wire::Transport;

use crate::events::Event;

/// Passive consumer of domain events.
pub trait EventSink {
    fn emit(&mut self, event: &Event);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: &Event) {
        (**self).emit(event);
    }
}

/// Wrap a sink as a bus handler that ignores the command surface.
pub fn sink_handler<C, S>(mut sink: S) -> impl FnMut(&Event, &mut C) + Send + 'static
where
    C: 'static,
    S: EventSink + Send + 'static,
{
    move |event: &Event, _: &mut C| sink.emit(event)
}
