//! Inbound message dispatcher.
//!
//! Decodes one daemon message, applies it to the [`Directory`] and returns
//! the event it produces, if any. Flat dispatch over [`InboundKind`];
//! unsupported opcodes fall through an explicit default arm.
//!
//! Outcomes per message:
//! - `Ok(Some(event))`: handled, emit `event`
//! - `Ok(None)`: handled or dropped, nothing to emit (ack failure, lookup
//!   miss, empty advertisement, unsupported opcode)
//! - `Err(_)`: malformed arguments; the caller logs and moves on

use log::{debug, warn};
use uuid::Uuid;

use crate::config::DuplicatePolicy;
use crate::directory::advertisement::is_connectable;
use crate::directory::{Advertisement, Characteristic, Descriptor, Directory, Service, Sighting};
use crate::error::DecodeError;
use crate::events::{AdapterState, Event};
use crate::gatt::{GattUuid, Properties};
use crate::wire::{Dict, InboundKind, Message, ProtocolRevision, Value, keys};

/// Stateless decoder bound to one protocol revision and duplicate policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    revision: ProtocolRevision,
    policy: DuplicatePolicy,
}

impl Dispatcher {
    pub fn new(revision: ProtocolRevision, policy: DuplicatePolicy) -> Self {
        Self { revision, policy }
    }

    pub fn revision(&self) -> ProtocolRevision {
        self.revision
    }

    /// Process one inbound message.
    ///
    /// `allow_duplicates` is the flag recorded by the last scan command.
    pub fn dispatch(
        &self,
        message: &Message,
        directory: &mut Directory,
        allow_duplicates: bool,
    ) -> Result<Option<Event>, DecodeError> {
        let Some(kind) = self.revision.inbound(message.id) else {
            debug!("dispatch: unsupported message id {}", message.id);
            return Ok(None);
        };
        let args = &message.args;

        let result = match kind {
            InboundKind::StateChange => state_change(args),
            InboundKind::AdvertisingStarted => {
                advertising_ack(args, "advertisingStart", Event::AdvertisingStart)
            }
            InboundKind::AdvertisingStopped => {
                advertising_ack(args, "advertisingStop", Event::AdvertisingStop)
            }
            InboundKind::Discovered => self.discovered(args, directory, allow_duplicates),
            InboundKind::Connected => {
                device(args).map(|peripheral| Some(Event::Connect { peripheral }))
            }
            InboundKind::Disconnected => {
                device(args).map(|peripheral| Some(Event::Disconnect { peripheral }))
            }
            InboundKind::MtuChanged => mtu_changed(args, directory),
            InboundKind::ServicesDiscovered => services_discovered(args, directory),
            InboundKind::RssiUpdated => rssi_updated(args, directory),
            InboundKind::CharacteristicsDiscovered => characteristics_discovered(args, directory),
            InboundKind::CharacteristicValue => characteristic_value(args, directory),
            InboundKind::DescriptorsDiscovered => descriptors_discovered(args, directory),
        };
        result.map_err(|e| e.within(kind))
    }

    fn discovered(
        &self,
        args: &Dict,
        directory: &mut Directory,
        allow_duplicates: bool,
    ) -> Result<Option<Event>, DecodeError> {
        let adv = match args.get(keys::ADVERTISEMENT_DATA) {
            Some(Value::Dict(d)) if !d.is_empty() => d,
            Some(Value::Dict(_)) | None => return Ok(None),
            Some(_) => {
                return Err(DecodeError::WrongType {
                    key: keys::ADVERTISEMENT_DATA,
                    expected: "dict",
                });
            }
        };

        let id = device(args)?;
        let advertisement = Advertisement::decode(adv, &args.string_or(keys::NAME, ""))?;
        let rssi = i32::try_from(args.int_or(keys::RSSI, 0)).unwrap_or(0);
        let connectable = is_connectable(adv);

        let (p, sighting) = directory.upsert_peripheral(id, advertisement, rssi, connectable);
        let emit = match sighting {
            Sighting::New => true,
            Sighting::Changed => {
                allow_duplicates || self.policy == DuplicatePolicy::AdvertisementChanged
            }
            Sighting::Repeated => allow_duplicates,
        };
        if !emit {
            return Ok(None);
        }
        Ok(Some(Event::Discover {
            peripheral: p.id,
            advertisement: p.advertisement.clone(),
            rssi: p.rssi,
            connectable: p.connectable,
        }))
    }
}

// ───────────────────────────────────────────────────────────────
// Per-kind decoders
// ───────────────────────────────────────────────────────────────

fn device(args: &Dict) -> Result<Uuid, DecodeError> {
    args.uuid(keys::DEVICE_UUID)
}

fn handle(dict: &Dict, key: &'static str) -> Result<u16, DecodeError> {
    dict.int_as::<u16>(key)
}

fn entries<'a>(
    args: &'a Dict,
    key: &'static str,
) -> impl Iterator<Item = Result<&'a Dict, DecodeError>> {
    args.array_or_empty(key).iter().map(move |v| {
        v.as_dict().ok_or(DecodeError::WrongType {
            key,
            expected: "dict",
        })
    })
}

fn attribute_uuid(dict: &Dict) -> Result<GattUuid, DecodeError> {
    let value = dict
        .get(keys::UUID)
        .ok_or(DecodeError::MissingArgument(keys::UUID))?;
    GattUuid::from_value(value, keys::UUID)
}

fn state_change(args: &Dict) -> Result<Option<Event>, DecodeError> {
    let index = args.int(keys::STATE)?;
    let state = AdapterState::from_index(index).ok_or(DecodeError::OutOfRange {
        key: keys::STATE,
        value: index,
    })?;
    Ok(Some(Event::StateChange(state)))
}

fn advertising_ack(
    args: &Dict,
    what: &str,
    event: Event,
) -> Result<Option<Event>, DecodeError> {
    let result = args.int(keys::RESULT)?;
    if result != 0 {
        warn!("dispatch: error in {what}: result {result}");
        return Ok(None);
    }
    Ok(Some(event))
}

fn mtu_changed(args: &Dict, directory: &Directory) -> Result<Option<Event>, DecodeError> {
    let id = device(args)?;
    let mtu = args.int_as::<u16>(keys::ATT_MTU)?;
    if !directory.contains(id) {
        debug!("dispatch: mtu change for unknown peripheral {id}");
        return Ok(None);
    }
    Ok(Some(Event::MtuChange {
        peripheral: id,
        mtu,
    }))
}

fn rssi_updated(args: &Dict, directory: &mut Directory) -> Result<Option<Event>, DecodeError> {
    let id = device(args)?;
    let rssi = args.int_as::<i32>(keys::DATA)?;
    if directory.update_rssi(id, rssi).is_none() {
        debug!("dispatch: rssi update for unknown peripheral {id}");
        return Ok(None);
    }
    Ok(Some(Event::RssiUpdate {
        peripheral: id,
        rssi,
    }))
}

fn services_discovered(
    args: &Dict,
    directory: &mut Directory,
) -> Result<Option<Event>, DecodeError> {
    let id = device(args)?;
    let services = entries(args, keys::SERVICES)
        .map(|entry| {
            let s = entry?;
            Ok(Service::new(
                attribute_uuid(s)?,
                handle(s, keys::SERVICE_START_HANDLE)?,
                handle(s, keys::SERVICE_END_HANDLE)?,
            ))
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;
    let uuids = services.iter().map(|s| s.uuid).collect();

    if directory.set_services(id, services).is_none() {
        debug!("dispatch: services for unknown peripheral {id}");
        return Ok(None);
    }
    Ok(Some(Event::ServicesDiscover {
        peripheral: id,
        services: uuids,
    }))
}

fn characteristics_discovered(
    args: &Dict,
    directory: &mut Directory,
) -> Result<Option<Event>, DecodeError> {
    let id = device(args)?;
    let start = handle(args, keys::SERVICE_START_HANDLE)?;
    let characteristics = entries(args, keys::CHARACTERISTICS)
        .map(|entry| {
            let c = entry?;
            Ok(Characteristic::new(
                attribute_uuid(c)?,
                handle(c, keys::CHARACTERISTIC_HANDLE)?,
                handle(c, keys::CHARACTERISTIC_VALUE_HANDLE)?,
                Properties::from_bits(c.int_or(keys::CHARACTERISTIC_PROPERTIES, 0)),
            ))
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;
    let uuids = characteristics.iter().map(|c| c.uuid).collect();

    let Some(service) = directory.set_characteristics(id, start, characteristics) else {
        warn!("dispatch: characteristics for unknown service (peripheral {id}, start handle {start})");
        return Ok(None);
    };
    Ok(Some(Event::CharacteristicsDiscover {
        peripheral: id,
        service: service.uuid,
        characteristics: uuids,
    }))
}

fn descriptors_discovered(
    args: &Dict,
    directory: &mut Directory,
) -> Result<Option<Event>, DecodeError> {
    let id = device(args)?;
    let owner = handle(args, keys::CHARACTERISTIC_HANDLE)?;
    let descriptors = entries(args, keys::DESCRIPTORS)
        .map(|entry| {
            let d = entry?;
            Ok(Descriptor::new(
                attribute_uuid(d)?,
                handle(d, keys::DESCRIPTOR_HANDLE)?,
            ))
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;
    let uuids = descriptors.iter().map(|d| d.uuid).collect();

    let service = directory
        .peripheral(id)
        .and_then(|p| p.characteristic_by_handle(owner))
        .map(|(s, _)| s.uuid);
    let characteristic = directory
        .set_descriptors(id, owner, descriptors)
        .map(|c| c.uuid);
    let (Some(service), Some(characteristic)) = (service, characteristic) else {
        warn!("dispatch: descriptors for unknown characteristic (peripheral {id}, handle {owner})");
        return Ok(None);
    };
    Ok(Some(Event::DescriptorsDiscover {
        peripheral: id,
        service,
        characteristic,
        descriptors: uuids,
    }))
}

fn characteristic_value(args: &Dict, directory: &Directory) -> Result<Option<Event>, DecodeError> {
    let id = device(args)?;
    let owner = handle(args, keys::CHARACTERISTIC_HANDLE)?;
    let data = args.bytes_or_empty(keys::DATA);
    let is_notification = args.int_or(keys::IS_NOTIFICATION, 0) != 0;

    let Some((service, characteristic)) = directory
        .peripheral(id)
        .and_then(|p| p.characteristic_by_handle(owner))
    else {
        warn!("dispatch: value for unknown characteristic (peripheral {id}, handle {owner})");
        return Ok(None);
    };
    Ok(Some(Event::Read {
        peripheral: id,
        service: service.uuid,
        characteristic: characteristic.uuid,
        data,
        is_notification,
    }))
}
