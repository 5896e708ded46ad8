//! Fuzz target: `Dispatcher::dispatch`
//!
//! Interprets the input as a JSON message and drives it through both
//! protocol revisions against one shared directory. The dispatcher must
//! never panic and must never report an event for a peripheral the
//! directory does not hold.
//!
//! cargo fuzz run fuzz_dispatch

#![no_main]

use blued_client::app::Dispatcher;
use blued_client::config::DuplicatePolicy;
use blued_client::directory::Directory;
use blued_client::wire::{Message, ProtocolRevision};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(message) = serde_json::from_slice::<Message>(data) else {
        return;
    };

    let mut directory = Directory::new();
    for revision in [ProtocolRevision::Current, ProtocolRevision::Legacy] {
        let dispatcher = Dispatcher::new(revision, DuplicatePolicy::AdvertisementChanged);
        if let Ok(Some(event)) = dispatcher.dispatch(&message, &mut directory, true) {
            if let Some(id) = event.peripheral() {
                assert!(directory.contains(id) || matches!(
                    event,
                    blued_client::Event::Connect { .. } | blued_client::Event::Disconnect { .. }
                ));
            }
        }
    }
});
