//! Outbound command encoding.
//!
//! Each function turns one imperative request into the message the daemon
//! expects. Peripheral-targeted commands resolve their target in the
//! [`Directory`] first and refuse to encode anything for an entity the
//! session has not discovered. Nothing here writes to the directory.

use uuid::Uuid;

use crate::beacon::{BeaconFormat, IBeacon};
use crate::config::SessionConfig;
use crate::directory::{Characteristic, Directory, Peripheral, Service};
use crate::error::{Error, Result};
use crate::gatt::{GattUuid, LocalService, PublishedAttribute, encode_local};
use crate::wire::{Dict, Message, Outbound, Value, keys};

/// Primary service type for add-service.
const SERVICE_TYPE_PRIMARY: i64 = 1;

fn uuid_list(uuids: &[GattUuid]) -> Value {
    Value::Array(uuids.iter().map(|u| Value::Str(u.to_string())).collect())
}

fn msg(op: Outbound, args: Dict) -> Message {
    Message::new(op.id(), args)
}

// ───────────────────────────────────────────────────────────────
// Target resolution
// ───────────────────────────────────────────────────────────────

fn peripheral(dir: &Directory, id: Uuid) -> Result<&Peripheral> {
    dir.peripheral(id).ok_or(Error::UnknownPeripheral(id))
}

fn service(dir: &Directory, id: Uuid, uuid: GattUuid) -> Result<&Service> {
    peripheral(dir, id)?
        .service(uuid)
        .ok_or_else(|| Error::UnknownService {
            peripheral: id,
            service: uuid.to_string(),
        })
}

fn characteristic(
    dir: &Directory,
    id: Uuid,
    service_uuid: GattUuid,
    uuid: GattUuid,
) -> Result<&Characteristic> {
    service(dir, id, service_uuid)?
        .characteristic(uuid)
        .ok_or_else(|| Error::UnknownCharacteristic {
            peripheral: id,
            service: service_uuid.to_string(),
            characteristic: uuid.to_string(),
        })
}

// ───────────────────────────────────────────────────────────────
// Session-level commands
// ───────────────────────────────────────────────────────────────

/// Register with the daemon as `<client_name>-<unix_secs>`.
pub fn init(config: &SessionConfig, unix_secs: u64) -> Message {
    msg(
        Outbound::Init,
        Dict::new()
            .with(keys::NAME, format!("{}-{}", config.client_name, unix_secs))
            .with(
                keys::OPTIONS,
                Dict::new().with(keys::INIT_SHOW_POWER_ALERT, config.show_power_alert),
            )
            .with(keys::TYPE, 0_i64),
    )
}

pub fn start_advertising(name: &str, services: &[GattUuid]) -> Message {
    msg(
        Outbound::StartAdvertising,
        Dict::new()
            .with(keys::ADV_LOCAL_NAME, name)
            .with(keys::ADV_SERVICE_UUIDS, uuid_list(services)),
    )
}

pub fn start_advertising_ibeacon(beacon: &IBeacon, format: BeaconFormat) -> Message {
    let data = match format {
        BeaconFormat::BeaconKey => beacon.payload().to_vec(),
        BeaconFormat::ManufacturerData => beacon.manufacturer_frame().to_vec(),
    };
    msg(
        Outbound::StartAdvertising,
        Dict::new().with(format.key(), data),
    )
}

/// Advertise a caller-built beacon payload.
pub fn start_advertising_ibeacon_data(data: &[u8], format: BeaconFormat) -> Result<Message> {
    let encoded = format.encode(data)?;
    Ok(msg(
        Outbound::StartAdvertising,
        Dict::new().with(format.key(), encoded),
    ))
}

pub fn stop_advertising() -> Message {
    Message::bare(Outbound::StopAdvertising.id())
}

pub fn remove_all_services() -> Message {
    Message::bare(Outbound::RemoveAllServices.id())
}

pub fn start_scanning(services: &[GattUuid], allow_duplicates: bool) -> Message {
    let mut options = Dict::new();
    if allow_duplicates {
        options.insert(keys::SCAN_ALLOW_DUPLICATES, 1_i64);
    }
    msg(
        Outbound::StartScanning,
        Dict::new()
            .with(keys::UUIDS, uuid_list(services))
            .with(keys::OPTIONS, options),
    )
}

pub fn stop_scanning() -> Message {
    Message::bare(Outbound::StopScanning.id())
}

// ───────────────────────────────────────────────────────────────
// Peripheral-targeted commands
// ───────────────────────────────────────────────────────────────

pub fn connect(dir: &Directory, id: Uuid) -> Result<Message> {
    let p = peripheral(dir, id)?;
    Ok(msg(
        Outbound::Connect,
        Dict::new()
            .with(
                keys::OPTIONS,
                Dict::new().with(keys::CONNECT_NOTIFY_ON_DISCONNECTION, 1_i64),
            )
            .with(keys::DEVICE_UUID, p.id),
    ))
}

pub fn disconnect(dir: &Directory, id: Uuid) -> Result<Message> {
    let p = peripheral(dir, id)?;
    Ok(msg(
        Outbound::Disconnect,
        Dict::new().with(keys::DEVICE_UUID, p.id),
    ))
}

pub fn update_rssi(dir: &Directory, id: Uuid) -> Result<Message> {
    let p = peripheral(dir, id)?;
    Ok(msg(
        Outbound::UpdateRssi,
        Dict::new().with(keys::DEVICE_UUID, p.id),
    ))
}

/// Discover services, optionally restricted to `filter`.
pub fn discover_services(dir: &Directory, id: Uuid, filter: &[GattUuid]) -> Result<Message> {
    let p = peripheral(dir, id)?;
    Ok(msg(
        Outbound::DiscoverServices,
        Dict::new()
            .with(keys::DEVICE_UUID, p.id)
            .with(keys::UUIDS, uuid_list(filter)),
    ))
}

/// Discover the characteristics inside one service's handle range.
pub fn discover_characteristics(
    dir: &Directory,
    id: Uuid,
    service_uuid: GattUuid,
    filter: &[GattUuid],
) -> Result<Message> {
    let s = service(dir, id, service_uuid)?;
    Ok(msg(
        Outbound::DiscoverCharacteristics,
        Dict::new()
            .with(keys::DEVICE_UUID, id)
            .with(keys::SERVICE_START_HANDLE, s.start_handle)
            .with(keys::SERVICE_END_HANDLE, s.end_handle)
            .with(keys::UUIDS, uuid_list(filter)),
    ))
}

fn characteristic_command(
    op: Outbound,
    dir: &Directory,
    id: Uuid,
    service_uuid: GattUuid,
    uuid: GattUuid,
) -> Result<Message> {
    let c = characteristic(dir, id, service_uuid, uuid)?;
    Ok(msg(
        op,
        Dict::new()
            .with(keys::DEVICE_UUID, id)
            .with(keys::CHARACTERISTIC_HANDLE, c.handle)
            .with(keys::CHARACTERISTIC_VALUE_HANDLE, c.value_handle),
    ))
}

pub fn read(
    dir: &Directory,
    id: Uuid,
    service_uuid: GattUuid,
    uuid: GattUuid,
) -> Result<Message> {
    characteristic_command(Outbound::ReadCharacteristic, dir, id, service_uuid, uuid)
}

pub fn discover_descriptors(
    dir: &Directory,
    id: Uuid,
    service_uuid: GattUuid,
    uuid: GattUuid,
) -> Result<Message> {
    characteristic_command(Outbound::DiscoverDescriptors, dir, id, service_uuid, uuid)
}

// ───────────────────────────────────────────────────────────────
// Local GATT server
// ───────────────────────────────────────────────────────────────

/// Everything produced by publishing a local GATT server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Publication {
    /// Remove-all followed by one add-service per service.
    pub messages: Vec<Message>,
    /// Attribute table; attribute id `n` is at index `n - 1`.
    pub attributes: Vec<PublishedAttribute>,
    /// Id of the last service added, 0 when none.
    pub last_service_attribute_id: u32,
}

/// Assign attribute ids from 1 (each service, then its characteristics)
/// and encode one add-service message per service.
pub fn publish(services: &[LocalService]) -> Publication {
    let mut out = Publication {
        messages: vec![remove_all_services()],
        ..Publication::default()
    };
    let mut next_id: u32 = 1;

    for service in services {
        let service_id = next_id;
        next_id += 1;
        out.attributes.push(PublishedAttribute::Service(service.clone()));
        out.last_service_attribute_id = service_id;

        let mut characteristics = Vec::with_capacity(service.characteristics.len());
        for c in &service.characteristics {
            let encoding = encode_local(c.properties, c.secure);
            let descriptors: Vec<Value> = c
                .descriptors
                .iter()
                .map(|d| {
                    Dict::new()
                        .with(keys::DATA, d.value.clone())
                        .with(keys::UUID, d.uuid.to_string())
                        .into()
                })
                .collect();

            characteristics.push(Value::from(
                Dict::new()
                    .with(keys::ATTRIBUTE_ID, next_id)
                    .with(keys::ATTRIBUTE_PERMISSIONS, encoding.permissions)
                    .with(keys::CHARACTERISTIC_PROPERTIES, encoding.properties)
                    .with(keys::DATA, c.value.clone())
                    .with(keys::DESCRIPTORS, descriptors)
                    .with(keys::UUID, c.uuid.to_string()),
            ));
            out.attributes.push(PublishedAttribute::Characteristic(c.clone()));
            next_id += 1;
        }

        out.messages.push(msg(
            Outbound::AddService,
            Dict::new()
                .with(keys::ATTRIBUTE_ID, service_id)
                .with(keys::ATTRIBUTE_IDS, Vec::<Value>::new())
                .with(keys::CHARACTERISTICS, characteristics)
                .with(keys::TYPE, SERVICE_TYPE_PRIMARY)
                .with(keys::UUID, service.uuid.to_string()),
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gatt::{LocalCharacteristic, LocalDescriptor, Properties};

    #[test]
    fn init_names_the_client() {
        let m = init(&SessionConfig::default(), 1_700_000_000);
        assert_eq!(m.id, 1);
        assert_eq!(
            m.args.get(keys::NAME).and_then(Value::as_str),
            Some("blued-client-1700000000")
        );
        let opts = m.args.dict(keys::OPTIONS).unwrap();
        assert_eq!(opts.int(keys::INIT_SHOW_POWER_ALERT), Ok(0));
        assert_eq!(m.args.int(keys::TYPE), Ok(0));
    }

    #[test]
    fn scan_options_follow_allow_duplicates() {
        let m = start_scanning(&[GattUuid::Short16(0x180d)], true);
        assert_eq!(m.id, 29);
        let opts = m.args.dict(keys::OPTIONS).unwrap();
        assert_eq!(opts.int(keys::SCAN_ALLOW_DUPLICATES), Ok(1));
        assert_eq!(
            m.args.array(keys::UUIDS).unwrap(),
            &[Value::Str("180d".into())]
        );

        let m = start_scanning(&[], false);
        assert!(m.args.dict(keys::OPTIONS).unwrap().is_empty());
    }

    #[test]
    fn unknown_peripheral_is_refused() {
        let dir = Directory::new();
        let id = Uuid::from_u128(7);
        assert!(matches!(connect(&dir, id), Err(Error::UnknownPeripheral(u)) if u == id));
        assert!(matches!(
            discover_services(&dir, id, &[]),
            Err(Error::UnknownPeripheral(_))
        ));
    }

    #[test]
    fn beacon_goes_under_the_configured_key() {
        let b = IBeacon::new(Uuid::nil(), 1, 2, -59);
        let m = start_advertising_ibeacon(&b, BeaconFormat::BeaconKey);
        assert_eq!(m.args.bytes(keys::ADV_APPLE_BEACON_KEY).unwrap().len(), 21);

        let m = start_advertising_ibeacon(&b, BeaconFormat::ManufacturerData);
        assert_eq!(m.args.bytes(keys::ADV_APPLE_MFG_DATA).unwrap().len(), 27);
    }

    #[test]
    fn publish_assigns_ids_from_one() {
        let services = [
            LocalService::new(GattUuid::Short16(0x180f)).characteristic(
                LocalCharacteristic::new(GattUuid::Short16(0x2a19), Properties::READ)
                    .value(vec![100]),
            ),
            LocalService::new(GattUuid::Short16(0x1805))
                .characteristic(LocalCharacteristic::new(
                    GattUuid::Short16(0x2a2b),
                    Properties::READ | Properties::NOTIFY,
                ))
                .characteristic(LocalCharacteristic::new(
                    GattUuid::Short16(0x2a0f),
                    Properties::WRITE,
                )),
        ];
        let p = publish(&services);

        assert_eq!(p.messages.len(), 3);
        assert_eq!(p.messages[0], Message::bare(12));
        assert_eq!(p.messages[1].args.int(keys::ATTRIBUTE_ID), Ok(1));
        assert_eq!(p.messages[2].args.int(keys::ATTRIBUTE_ID), Ok(3));
        assert_eq!(p.last_service_attribute_id, 3);
        assert_eq!(p.attributes.len(), 5);

        let chars = p.messages[2].args.array(keys::CHARACTERISTICS).unwrap();
        let ids: Vec<i64> = chars
            .iter()
            .map(|c| c.as_dict().unwrap().int(keys::ATTRIBUTE_ID).unwrap())
            .collect();
        assert_eq!(ids, [4, 5]);
    }

    #[test]
    fn publish_encodes_security_and_descriptors() {
        let services = [LocalService::new(GattUuid::Short16(0x180f)).characteristic(
            LocalCharacteristic::new(
                GattUuid::Short16(0x2a19),
                Properties::READ | Properties::WRITE | Properties::NOTIFY,
            )
            .secure(Properties::WRITE | Properties::NOTIFY)
            .descriptor(LocalDescriptor::new(GattUuid::Short16(0x2901), b"Level".to_vec())),
        )];
        let p = publish(&services);

        let chars = p.messages[1].args.array(keys::CHARACTERISTICS).unwrap();
        assert_eq!(chars.len(), 1);
        let c = chars[0].as_dict().unwrap();
        // read | write | encrypted notify
        assert_eq!(c.int(keys::CHARACTERISTIC_PROPERTIES), Ok(0x10a));
        // plain read, encrypted write
        assert_eq!(c.int(keys::ATTRIBUTE_PERMISSIONS), Ok(0x09));

        let descriptors = c.array(keys::DESCRIPTORS).unwrap();
        assert_eq!(descriptors.len(), 1);
        let d = descriptors[0].as_dict().unwrap();
        assert_eq!(d.bytes(keys::DATA), Ok(&b"Level"[..]));
        assert_eq!(d.get(keys::UUID).and_then(Value::as_str), Some("2901"));
    }

    #[test]
    fn publish_nothing_only_clears() {
        let p = publish(&[]);
        assert_eq!(p.messages, [Message::bare(12)]);
        assert_eq!(p.last_service_attribute_id, 0);
    }
}
