//! Integration tests for outbound commands issued through the Central,
//! including commands issued from inside event handlers.

use blued_client::gatt::PublishedAttribute;
use blued_client::prelude::*;
use blued_client::wire::{Outbound, Value, keys};

use crate::support::{self, PHONE, WATCH};

fn discovered_session() -> Session<MemoryTransport> {
    let mut s = Session::new(MemoryTransport::new(), SessionConfig::default());
    for m in [
        support::discover(PHONE, "phone", -50),
        support::services(PHONE, &[(GattUuid::Short16(0x180f), 10, 14)]),
        support::characteristics(PHONE, 10, &[(GattUuid::Short16(0x2a19), 11, 12, 0x12)]),
    ] {
        s.handle_message(&m).unwrap();
    }
    s
}

#[test]
fn init_is_first_and_carries_client_name() {
    let mut central = Central::new(MemoryTransport::new(), SessionConfig::default());
    central.init().unwrap();

    let m = central.transport().last().unwrap();
    assert_eq!(m.id, Outbound::Init.id());
    let name = m.args.get(keys::NAME).and_then(Value::as_str).unwrap();
    assert!(name.starts_with("blued-client-"), "got {name}");
}

#[test]
fn read_sends_both_handles() {
    let mut s = discovered_session();
    s.central_mut()
        .read(PHONE, GattUuid::Short16(0x180f), GattUuid::Short16(0x2a19))
        .unwrap();

    let m = s.central().transport().last().unwrap();
    assert_eq!(m.id, 65);
    assert_eq!(m.args.int(keys::CHARACTERISTIC_HANDLE), Ok(11));
    assert_eq!(m.args.int(keys::CHARACTERISTIC_VALUE_HANDLE), Ok(12));
    assert_eq!(m.args.uuid(keys::DEVICE_UUID), Ok(PHONE));
}

#[test]
fn discover_characteristics_sends_handle_range() {
    let mut s = discovered_session();
    s.central_mut()
        .discover_characteristics(PHONE, GattUuid::Short16(0x180f), &[])
        .unwrap();

    let m = s.central().transport().last().unwrap();
    assert_eq!(m.id, 62);
    assert_eq!(m.args.int(keys::SERVICE_START_HANDLE), Ok(10));
    assert_eq!(m.args.int(keys::SERVICE_END_HANDLE), Ok(14));
}

#[test]
fn commands_for_unknown_targets_send_nothing() {
    let mut s = discovered_session();
    let c = s.central_mut();

    assert!(matches!(c.connect(WATCH), Err(Error::UnknownPeripheral(id)) if id == WATCH));
    assert!(matches!(
        c.discover_characteristics(PHONE, GattUuid::Short16(0x1800), &[]),
        Err(Error::UnknownService { .. })
    ));
    assert!(matches!(
        c.read(PHONE, GattUuid::Short16(0x180f), GattUuid::Short16(0x2a00)),
        Err(Error::UnknownCharacteristic { .. })
    ));
    assert!(c.transport().sent().is_empty());
}

#[test]
fn handler_can_issue_commands() {
    let mut s = Session::new(MemoryTransport::new(), SessionConfig::default());
    s.on(EventKind::StateChange, |ev, central| {
        if *ev == Event::StateChange(AdapterState::PoweredOn) {
            central.start_scanning(&[], false).unwrap();
        }
    });
    s.on(EventKind::Discover, |ev, central| {
        if let Some(id) = ev.peripheral() {
            central.stop_scanning().unwrap();
            central.connect(id).unwrap();
        }
    });
    s.on(EventKind::Connect, |ev, central| {
        if let Some(id) = ev.peripheral() {
            central.discover_services(id, &[]).unwrap();
        }
    });

    for m in [
        support::powered_on(),
        support::discover(PHONE, "phone", -50),
        support::connected(PHONE),
    ] {
        s.handle_message(&m).unwrap();
    }

    assert_eq!(s.central().transport().ids(), vec![29, 30, 31, 44]);
}

#[test]
fn beacon_format_follows_config() {
    let beacon = IBeacon::new(PHONE, 1, 2, -57);

    let mut key = Central::new(MemoryTransport::new(), SessionConfig::default());
    key.start_advertising_ibeacon(&beacon).unwrap();
    let m = key.transport().last().unwrap();
    assert_eq!(m.id, 8);
    assert_eq!(m.args.bytes(keys::ADV_APPLE_BEACON_KEY), Ok(&beacon.payload()[..]));

    let config = SessionConfig {
        beacon_format: BeaconFormat::ManufacturerData,
        ..SessionConfig::default()
    };
    let mut mfg = Central::new(MemoryTransport::new(), config);
    mfg.start_advertising_ibeacon(&beacon).unwrap();
    let m = mfg.transport().last().unwrap();
    assert_eq!(
        m.args.bytes(keys::ADV_APPLE_MFG_DATA),
        Ok(&beacon.manufacturer_frame()[..])
    );
}

#[test]
fn oversized_beacon_frame_is_refused() {
    let config = SessionConfig {
        beacon_format: BeaconFormat::ManufacturerData,
        ..SessionConfig::default()
    };
    let mut central = Central::new(MemoryTransport::new(), config);
    assert!(central.start_advertising_ibeacon_data(&[0; 40]).is_err());
    assert!(central.transport().sent().is_empty());
}

#[test]
fn publishing_services_numbers_attributes() {
    let mut central = Central::new(MemoryTransport::new(), SessionConfig::default());
    central
        .set_services(&[
            LocalService::new(GattUuid::Short16(0x180f)).characteristic(
                LocalCharacteristic::new(GattUuid::Short16(0x2a19), Properties::READ)
                    .value(vec![100]),
            ),
            LocalService::new(GattUuid::Short16(0x1805)),
        ])
        .unwrap();

    assert_eq!(central.transport().ids(), vec![12, 10, 10]);
    assert_eq!(central.published_len(), 3);
    assert_eq!(central.last_service_attribute_id(), 3);
    assert_eq!(
        central.published(2).map(PublishedAttribute::uuid),
        Some(GattUuid::Short16(0x2a19))
    );
}
