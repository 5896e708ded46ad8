//! Integration tests for the inbound pipeline:
//! message → Dispatcher → Directory → EventBus → handlers.

use std::sync::{Arc, Mutex};

use blued_client::prelude::*;
use blued_client::wire::{Dict, keys};

use crate::support::{self, PHONE, WATCH};

type Recorded = Arc<Mutex<Vec<Event>>>;

fn session_with(config: SessionConfig) -> (Session<MemoryTransport>, Recorded) {
    let mut session = Session::new(MemoryTransport::new(), config);
    let seen: Recorded = Arc::default();
    let sink = seen.clone();
    session.on_all(move |ev, _| {
        if let Ok(mut v) = sink.lock() {
            v.push(ev.clone());
        }
    });
    (session, seen)
}

fn session() -> (Session<MemoryTransport>, Recorded) {
    session_with(SessionConfig::default())
}

fn kinds(seen: &Recorded) -> Vec<EventKind> {
    seen.lock().unwrap().iter().map(Event::kind).collect()
}

fn feed(session: &mut Session<MemoryTransport>, messages: &[Message]) {
    for m in messages {
        session.handle_message(m).unwrap();
    }
}

/// Discover PHONE and give it a heart-rate service with two characteristics.
fn explored(session: &mut Session<MemoryTransport>) {
    feed(
        session,
        &[
            support::discover(PHONE, "phone", -50),
            support::connected(PHONE),
            support::services(
                PHONE,
                &[
                    (GattUuid::Short16(0x180d), 1, 8),
                    (GattUuid::Short16(0xabcd), 9, 12),
                ],
            ),
            support::characteristics(
                PHONE,
                1,
                &[
                    (GattUuid::Short16(0x2a37), 2, 3, 0x10),
                    (GattUuid::Short16(0x2a38), 5, 6, 0x02),
                ],
            ),
        ],
    );
}

// ── Discovery and duplicate filtering ─────────────────────────

#[test]
fn state_change_reaches_handler() {
    let (mut s, seen) = session();
    feed(&mut s, &[support::powered_on()]);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Event::StateChange(AdapterState::PoweredOn)]
    );
}

#[test]
fn repeated_sightings_are_filtered_without_duplicates() {
    let (mut s, seen) = session();
    s.central_mut().start_scanning(&[], false).unwrap();
    for _ in 0..5 {
        feed(&mut s, &[support::discover(PHONE, "phone", -50)]);
    }
    feed(&mut s, &[support::discover(WATCH, "watch", -70)]);

    assert_eq!(kinds(&seen), vec![EventKind::Discover, EventKind::Discover]);
    assert_eq!(s.central().directory().len(), 2);
}

#[test]
fn allow_duplicates_reports_every_sighting() {
    let (mut s, seen) = session();
    s.central_mut().start_scanning(&[], true).unwrap();
    for _ in 0..3 {
        feed(&mut s, &[support::discover(PHONE, "phone", -50)]);
    }
    assert_eq!(kinds(&seen).len(), 3);
    assert_eq!(s.central().directory().len(), 1);
}

#[test]
fn changed_advertisement_updates_in_place_but_is_not_reported() {
    let (mut s, seen) = session();
    feed(
        &mut s,
        &[
            support::discover(PHONE, "adv1", -50),
            support::discover(PHONE, "adv2", -40),
        ],
    );

    assert_eq!(kinds(&seen), vec![EventKind::Discover]);
    let p = s.central().directory().peripheral(PHONE).unwrap();
    assert_eq!(p.advertisement.local_name, "adv2");
    assert_eq!(p.rssi, -40);
}

#[test]
fn change_policy_reports_changed_advertisement() {
    let config = SessionConfig {
        duplicate_policy: DuplicatePolicy::AdvertisementChanged,
        ..SessionConfig::default()
    };
    let (mut s, seen) = session_with(config);
    feed(
        &mut s,
        &[
            support::discover(PHONE, "adv1", -50),
            support::discover(PHONE, "adv1", -45),
            support::discover(PHONE, "adv2", -40),
        ],
    );
    assert_eq!(kinds(&seen), vec![EventKind::Discover, EventKind::Discover]);
}

#[test]
fn empty_advertisement_is_dropped() {
    let (mut s, seen) = session();
    feed(&mut s, &[support::discover_with(PHONE, Dict::new(), -50)]);
    assert!(seen.lock().unwrap().is_empty());
    assert!(s.central().directory().is_empty());
}

#[test]
fn beacon_advertisement_is_decoded() {
    let beacon = IBeacon::new(WATCH, 7, 9, -59);
    let adv = Dict::new().with(
        keys::ADV_MANUFACTURER_DATA,
        beacon.manufacturer_frame().to_vec(),
    );
    let (mut s, seen) = session();
    feed(&mut s, &[support::discover_with(PHONE, adv, -60)]);

    let seen = seen.lock().unwrap();
    let Event::Discover { advertisement, .. } = &seen[0] else {
        panic!("expected discover, got {:?}", seen[0]);
    };
    assert_eq!(advertisement.ibeacon(), Some(beacon));
}

// ── GATT discovery ────────────────────────────────────────────

#[test]
fn services_are_annotated_from_known_table() {
    let (mut s, seen) = session();
    explored(&mut s);

    let p = s.central().directory().peripheral(PHONE).unwrap();
    assert_eq!(
        p.service(GattUuid::Short16(0x180d)).unwrap().name(),
        Some("Heart Rate")
    );
    assert_eq!(p.service(GattUuid::Short16(0xabcd)).unwrap().name(), None);

    let seen = seen.lock().unwrap();
    assert!(seen.contains(&Event::ServicesDiscover {
        peripheral: PHONE,
        services: vec![GattUuid::Short16(0x180d), GattUuid::Short16(0xabcd)],
    }));
}

#[test]
fn characteristics_attach_to_service_by_start_handle() {
    let (mut s, seen) = session();
    explored(&mut s);

    let service = s
        .central()
        .directory()
        .peripheral(PHONE)
        .and_then(|p| p.service(GattUuid::Short16(0x180d)))
        .unwrap();
    assert_eq!(service.characteristics.len(), 2);

    // Same entity by uuid, handle and value handle.
    let by_uuid = service.characteristic(GattUuid::Short16(0x2a37)).unwrap();
    let by_handle = service.characteristic_by_handle(2).unwrap();
    let by_value = service.characteristic_by_handle(3).unwrap();
    assert!(std::ptr::eq(by_uuid, by_handle));
    assert!(std::ptr::eq(by_uuid, by_value));
    assert!(by_uuid.properties.notifiable());

    assert_eq!(
        kinds(&seen).last(),
        Some(&EventKind::CharacteristicsDiscover)
    );
}

#[test]
fn characteristics_for_unknown_start_handle_are_dropped() {
    let (mut s, seen) = session();
    explored(&mut s);
    let before = seen.lock().unwrap().len();

    feed(
        &mut s,
        &[support::characteristics(
            PHONE,
            99,
            &[(GattUuid::Short16(0x2a19), 100, 101, 0x02)],
        )],
    );

    assert_eq!(seen.lock().unwrap().len(), before);
    let p = s.central().directory().peripheral(PHONE).unwrap();
    assert!(p.services.iter().all(|svc| svc
        .characteristic(GattUuid::Short16(0x2a19))
        .is_none()));
}

#[test]
fn descriptors_attach_to_owning_characteristic() {
    let (mut s, seen) = session();
    explored(&mut s);
    feed(
        &mut s,
        &[support::descriptors(
            PHONE,
            2,
            &[(GattUuid::Short16(0x2902), 4)],
        )],
    );

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen.last(),
        Some(&Event::DescriptorsDiscover {
            peripheral: PHONE,
            service: GattUuid::Short16(0x180d),
            characteristic: GattUuid::Short16(0x2a37),
            descriptors: vec![GattUuid::Short16(0x2902)],
        })
    );
}

#[test]
fn value_by_value_handle_names_its_characteristic() {
    let (mut s, seen) = session();
    explored(&mut s);
    feed(&mut s, &[support::value(PHONE, 3, &[0x06, 0x48], true)]);

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen.last(),
        Some(&Event::Read {
            peripheral: PHONE,
            service: GattUuid::Short16(0x180d),
            characteristic: GattUuid::Short16(0x2a37),
            data: vec![0x06, 0x48],
            is_notification: true,
        })
    );
}

#[test]
fn value_for_unknown_handle_is_dropped() {
    let (mut s, seen) = session();
    explored(&mut s);
    let before = seen.lock().unwrap().len();
    feed(&mut s, &[support::value(PHONE, 42, b"x", false)]);
    assert_eq!(seen.lock().unwrap().len(), before);
}

#[test]
fn rssi_and_mtu_for_known_peripheral() {
    let (mut s, seen) = session();
    feed(
        &mut s,
        &[
            support::discover(PHONE, "phone", -50),
            support::rssi(PHONE, -33),
            support::mtu(PHONE, 185),
            support::rssi(WATCH, -10),
        ],
    );

    assert_eq!(
        kinds(&seen),
        vec![
            EventKind::Discover,
            EventKind::RssiUpdate,
            EventKind::MtuChange
        ]
    );
    assert_eq!(s.central().directory().peripheral(PHONE).unwrap().rssi, -33);
}

// ── Malformed input and faults ────────────────────────────────

#[test]
fn malformed_message_is_an_error_and_session_continues() {
    let (mut s, seen) = session();
    let bad = Message::new(6, Dict::new().with(keys::STATE, "on"));
    assert!(matches!(s.handle_message(&bad), Err(Error::Decode(_))));

    feed(&mut s, &[support::powered_on()]);
    assert_eq!(kinds(&seen), vec![EventKind::StateChange]);
}

#[test]
fn unknown_opcode_is_ignored() {
    let (mut s, seen) = session();
    feed(&mut s, &[Message::bare(999)]);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn transport_fault_becomes_connection_fault_event() {
    let (mut s, seen) = session();
    s.handle(Inbound::Fault(
        blued_client::wire::TransportFault::Interrupted,
    ))
    .unwrap();
    assert_eq!(kinds(&seen), vec![EventKind::ConnectionFault]);
}

#[test]
fn failed_advertising_ack_emits_nothing() {
    let (mut s, seen) = session();
    feed(
        &mut s,
        &[support::advertising_started(1), support::advertising_started(0)],
    );
    assert_eq!(kinds(&seen), vec![EventKind::AdvertisingStart]);
}

// ── Revisions ─────────────────────────────────────────────────

#[test]
fn legacy_revision_swaps_services_and_rssi() {
    let config = SessionConfig {
        revision: ProtocolRevision::Legacy,
        ..SessionConfig::default()
    };
    let (mut s, seen) = session_with(config);
    feed(&mut s, &[support::discover(PHONE, "phone", -50)]);

    // 55 carries services under the legacy numbering.
    let mut services = support::services(PHONE, &[(GattUuid::Short16(0x180f), 1, 4)]);
    services.id = 55;
    let mut rssi = support::rssi(PHONE, -20);
    rssi.id = 54;
    feed(&mut s, &[services, rssi]);

    assert_eq!(
        kinds(&seen),
        vec![
            EventKind::Discover,
            EventKind::ServicesDiscover,
            EventKind::RssiUpdate
        ]
    );
}
