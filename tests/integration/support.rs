//! Inbound message builders shared by the integration tests.
//!
//! Each builder produces the message the daemon would send under the
//! current protocol revision.

#![allow(dead_code)]

use blued_client::gatt::GattUuid;
use blued_client::wire::{Dict, Message, Value, keys};
use uuid::Uuid;

pub const PHONE: Uuid = Uuid::from_u128(0x6b1e_0d3a_2f90_4c7e_9d1a_55c3_8e0b_7a41);
pub const WATCH: Uuid = Uuid::from_u128(0x0f3c_9a12_7b44_4e1d_a2c8_19e6_3d5f_b802);

fn uuid_data(uuid: GattUuid) -> Value {
    Value::Data(uuid.to_wire())
}

// ── Adapter / advertising ─────────────────────────────────────

pub fn state(index: i64) -> Message {
    Message::new(6, Dict::new().with(keys::STATE, index))
}

pub fn powered_on() -> Message {
    state(5)
}

pub fn advertising_started(result: i64) -> Message {
    Message::new(16, Dict::new().with(keys::RESULT, result))
}

// ── Discovery ─────────────────────────────────────────────────

pub fn discover_with(id: Uuid, adv: Dict, rssi: i64) -> Message {
    Message::new(
        37,
        Dict::new()
            .with(keys::DEVICE_UUID, id)
            .with(keys::RSSI, rssi)
            .with(keys::ADVERTISEMENT_DATA, adv),
    )
}

pub fn discover(id: Uuid, name: &str, rssi: i64) -> Message {
    discover_with(
        id,
        Dict::new()
            .with(keys::ADV_LOCAL_NAME, name)
            .with(keys::ADV_IS_CONNECTABLE, 1_i64),
        rssi,
    )
}

// ── Connection ────────────────────────────────────────────────

pub fn connected(id: Uuid) -> Message {
    Message::new(38, Dict::new().with(keys::DEVICE_UUID, id))
}

pub fn disconnected(id: Uuid) -> Message {
    Message::new(40, Dict::new().with(keys::DEVICE_UUID, id))
}

pub fn mtu(id: Uuid, mtu: i64) -> Message {
    Message::new(
        53,
        Dict::new()
            .with(keys::DEVICE_UUID, id)
            .with(keys::ATT_MTU, mtu),
    )
}

pub fn rssi(id: Uuid, rssi: i64) -> Message {
    Message::new(
        55,
        Dict::new()
            .with(keys::DEVICE_UUID, id)
            .with(keys::DATA, rssi),
    )
}

// ── GATT discovery ────────────────────────────────────────────

/// `(uuid, start, end)` per service.
pub fn services(id: Uuid, list: &[(GattUuid, i64, i64)]) -> Message {
    let entries = list
        .iter()
        .map(|&(uuid, start, end)| {
            Value::Dict(
                Dict::new()
                    .with(keys::UUID, uuid_data(uuid))
                    .with(keys::SERVICE_START_HANDLE, start)
                    .with(keys::SERVICE_END_HANDLE, end),
            )
        })
        .collect::<Vec<_>>();
    Message::new(
        54,
        Dict::new()
            .with(keys::DEVICE_UUID, id)
            .with(keys::SERVICES, entries),
    )
}

/// `(uuid, handle, value_handle, properties)` per characteristic.
pub fn characteristics(id: Uuid, start: i64, list: &[(GattUuid, i64, i64, i64)]) -> Message {
    let entries = list
        .iter()
        .map(|&(uuid, handle, value_handle, props)| {
            Value::Dict(
                Dict::new()
                    .with(keys::UUID, uuid_data(uuid))
                    .with(keys::CHARACTERISTIC_HANDLE, handle)
                    .with(keys::CHARACTERISTIC_VALUE_HANDLE, value_handle)
                    .with(keys::CHARACTERISTIC_PROPERTIES, props),
            )
        })
        .collect::<Vec<_>>();
    Message::new(
        63,
        Dict::new()
            .with(keys::DEVICE_UUID, id)
            .with(keys::SERVICE_START_HANDLE, start)
            .with(keys::CHARACTERISTICS, entries),
    )
}

/// `(uuid, handle)` per descriptor.
pub fn descriptors(id: Uuid, owner: i64, list: &[(GattUuid, i64)]) -> Message {
    let entries = list
        .iter()
        .map(|&(uuid, handle)| {
            Value::Dict(
                Dict::new()
                    .with(keys::UUID, uuid_data(uuid))
                    .with(keys::DESCRIPTOR_HANDLE, handle),
            )
        })
        .collect::<Vec<_>>();
    Message::new(
        75,
        Dict::new()
            .with(keys::DEVICE_UUID, id)
            .with(keys::CHARACTERISTIC_HANDLE, owner)
            .with(keys::DESCRIPTORS, entries),
    )
}

pub fn value(id: Uuid, handle: i64, data: &[u8], notification: bool) -> Message {
    Message::new(
        70,
        Dict::new()
            .with(keys::DEVICE_UUID, id)
            .with(keys::CHARACTERISTIC_HANDLE, handle)
            .with(keys::DATA, data)
            .with(keys::IS_NOTIFICATION, i64::from(notification)),
    )
}
