//! Integration tests for the threaded session worker and the JSON-lines
//! capture adapter.

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::thread;

use blued_client::adapters::read_capture;
use blued_client::prelude::*;
use blued_client::wire::TransportFault;

use crate::support::{self, PHONE, WATCH};

// ── Worker thread ─────────────────────────────────────────────

#[test]
fn spawned_session_processes_deliveries_in_order() {
    let mut session = Session::new(MemoryTransport::new(), SessionConfig::default());
    session.on(EventKind::StateChange, |_, central| {
        central.start_scanning(&[], false).unwrap();
    });
    let order = Arc::new(Mutex::new(Vec::new()));
    let sink = order.clone();
    session.on(EventKind::Discover, move |ev, _| {
        if let Some(id) = ev.peripheral() {
            sink.lock().unwrap().push(id);
        }
    });

    let handle = session.spawn();
    handle.deliver(support::powered_on()).unwrap();
    handle.deliver(support::discover(PHONE, "phone", -50)).unwrap();
    handle.deliver(support::discover(WATCH, "watch", -60)).unwrap();
    let session = handle.join().unwrap();

    assert_eq!(*order.lock().unwrap(), vec![PHONE, WATCH]);
    assert_eq!(session.central().transport().ids(), vec![29]);
    assert_eq!(session.central().directory().len(), 2);
}

#[test]
fn deliveries_from_another_thread_are_enqueued() {
    let session = Session::new(MemoryTransport::new(), SessionConfig::default());
    let handle = session.spawn();
    let tx = handle.sender();

    let producer = thread::spawn(move || {
        for i in 0..10 {
            let id = uuid::Uuid::from_u128(i);
            tx.send(support::discover(id, "n", -50).into()).unwrap();
        }
    });
    producer.join().unwrap();

    let session = handle.join().unwrap();
    assert_eq!(session.central().directory().len(), 10);
}

#[test]
fn fault_delivery_reaches_handler() {
    let mut session = Session::new(MemoryTransport::new(), SessionConfig::default());
    let faults = Arc::new(Mutex::new(Vec::new()));
    let sink = faults.clone();
    session.on(EventKind::ConnectionFault, move |ev, _| {
        if let Event::ConnectionFault(f) = ev {
            sink.lock().unwrap().push(f.clone());
        }
    });

    let handle = session.spawn();
    handle.deliver(TransportFault::Terminated).unwrap();
    handle.join().unwrap();

    assert_eq!(*faults.lock().unwrap(), vec![TransportFault::Terminated]);
}

// ── Capture replay ────────────────────────────────────────────

#[test]
fn capture_replay_drives_session() {
    let lines: Vec<String> = [support::powered_on(), support::discover(PHONE, "phone", -50)]
        .iter()
        .map(|m| serde_json::to_string(m).unwrap())
        .collect();
    let capture = format!(
        "# recorded session\n{}\n\n{}\n{{\"fault\":\"interrupted\"}}\n",
        lines[0], lines[1]
    );

    let mut session = Session::new(
        CaptureTransport::new(Vec::new()),
        SessionConfig::default(),
    );
    session.on(EventKind::StateChange, |_, central| {
        central.start_scanning(&[], true).unwrap();
    });
    let kinds = Arc::new(Mutex::new(Vec::new()));
    let sink = kinds.clone();
    session.on_all(move |ev, _| sink.lock().unwrap().push(ev.kind()));

    for record in read_capture(Cursor::new(capture)) {
        session.handle(record.unwrap()).unwrap();
    }

    // StateChange went to its own handler, not the wildcard.
    assert_eq!(
        *kinds.lock().unwrap(),
        vec![EventKind::Discover, EventKind::ConnectionFault]
    );

    let written = String::from_utf8(session.into_central().into_transport().into_inner()).unwrap();
    let sent: Message = serde_json::from_str(written.lines().next().unwrap()).unwrap();
    assert_eq!(sent.id, 29);
}

#[test]
fn bad_capture_line_reports_its_number() {
    let capture = "{\"id\":6,\"args\":{}}\nnot json\n";
    let results: Vec<_> = read_capture(Cursor::new(capture)).collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(Error::Capture { line: 2, .. })));
}
