//! Advertisement snapshot decoded from a discovery message.

use crate::beacon::IBeacon;
use crate::error::DecodeError;
use crate::gatt::GattUuid;
use crate::wire::{Dict, Value, keys};

/// One (service UUID, payload) pair from the service-data field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceData {
    pub uuid: GattUuid,
    pub data: Vec<u8>,
}

/// What a peripheral last advertised. Replaced wholesale on each sighting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advertisement {
    /// Empty when neither the advertisement nor the message carries one.
    pub local_name: String,
    /// 0 means the peripheral did not advertise a level.
    pub tx_power_level: i32,
    pub manufacturer_data: Vec<u8>,
    pub service_data: Vec<ServiceData>,
    pub service_uuids: Vec<GattUuid>,
}

impl Advertisement {
    /// Decode the advertisement dictionary.
    ///
    /// `fallback_name` is the message-level peripheral name, used when the
    /// advertisement itself has no local name.
    pub fn decode(adv: &Dict, fallback_name: &str) -> Result<Self, DecodeError> {
        let service_uuids = adv
            .array_or_empty(keys::ADV_SERVICE_UUIDS)
            .iter()
            .map(|v| GattUuid::from_value(v, keys::ADV_SERVICE_UUIDS))
            .collect::<Result<Vec<_>, _>>()?;

        // Alternating [uuid, data, uuid, data, ...]; an unpaired tail is ignored.
        let service_data = adv
            .array_or_empty(keys::ADV_SERVICE_DATA)
            .chunks_exact(2)
            .map(|pair| {
                let uuid = GattUuid::from_value(&pair[0], keys::ADV_SERVICE_DATA)?;
                let data = pair[1]
                    .as_bytes()
                    .ok_or(DecodeError::WrongType {
                        key: keys::ADV_SERVICE_DATA,
                        expected: "data",
                    })?
                    .to_vec();
                Ok(ServiceData { uuid, data })
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;

        Ok(Self {
            local_name: adv.string_or(keys::ADV_LOCAL_NAME, fallback_name),
            tx_power_level: adv.int_or(keys::ADV_TX_POWER_LEVEL, 0) as i32,
            manufacturer_data: adv.bytes_or_empty(keys::ADV_MANUFACTURER_DATA),
            service_data,
            service_uuids,
        })
    }

    /// The iBeacon carried in the manufacturer data, if any.
    pub fn ibeacon(&self) -> Option<IBeacon> {
        IBeacon::from_manufacturer_data(&self.manufacturer_data).ok()
    }

    pub fn advertises(&self, service: GattUuid) -> bool {
        self.service_uuids.contains(&service)
    }
}

/// Whether the advertising peripheral accepts connections.
pub(crate) fn is_connectable(adv: &Dict) -> bool {
    adv.get(keys::ADV_IS_CONNECTABLE)
        .and_then(Value::as_int)
        .is_some_and(|v| v != 0)
}
