//! In-memory transport: records every outgoing message.

use core::convert::Infallible;

use crate::wire::{Message, Transport};

#[derive(Debug, Default, Clone)]
pub struct MemoryTransport {
    sent: Vec<Message>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[Message] {
        &self.sent
    }

    pub fn last(&self) -> Option<&Message> {
        self.sent.last()
    }

    /// Opcodes of everything sent so far, in order.
    pub fn ids(&self) -> Vec<u32> {
        self.sent.iter().map(|m| m.id).collect()
    }

    /// Drain the recorded messages.
    pub fn take(&mut self) -> Vec<Message> {
        core::mem::take(&mut self.sent)
    }
}

impl Transport for MemoryTransport {
    type Error = Infallible;

    fn send(&mut self, message: &Message) -> Result<(), Self::Error> {
        self.sent.push(message.clone());
        Ok(())
    }
}
