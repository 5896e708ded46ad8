//! Opcode vocabulary, pinned per daemon protocol revision.
//!
//! Outbound opcodes are shared by every supported revision. Inbound opcodes
//! are resolved through [`ProtocolRevision::inbound`]; the two revisions
//! differ only in the 54/55 pair.
//!
//! | Inbound                     | Current | Legacy |
//! |-----------------------------|---------|--------|
//! | state change                | 6       | 6      |
//! | advertising start / stop    | 16 / 17 | 16 / 17|
//! | discovery                   | 37      | 37     |
//! | connect / disconnect        | 38 / 40 | 38 / 40|
//! | MTU change                  | 53      | 53     |
//! | services discovered         | 54      | 55     |
//! | rssi update                 | 55      | 54     |
//! | characteristics discovered  | 63      | 63     |
//! | characteristic value        | 70      | 70     |
//! | descriptors discovered      | 75      | 75     |

use serde::{Deserialize, Serialize};

/// Commands sent to the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Outbound {
    Init = 1,
    StartAdvertising = 8,
    StopAdvertising = 9,
    AddService = 10,
    RemoveAllServices = 12,
    StartScanning = 29,
    StopScanning = 30,
    Connect = 31,
    Disconnect = 32,
    UpdateRssi = 43,
    DiscoverServices = 44,
    DiscoverCharacteristics = 62,
    ReadCharacteristic = 65,
    DiscoverDescriptors = 70,
}

impl Outbound {
    pub const fn id(self) -> u32 {
        self as u32
    }
}

/// Closed set of inbound message kinds the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundKind {
    StateChange,
    AdvertisingStarted,
    AdvertisingStopped,
    Discovered,
    Connected,
    Disconnected,
    MtuChanged,
    ServicesDiscovered,
    RssiUpdated,
    CharacteristicsDiscovered,
    CharacteristicValue,
    DescriptorsDiscovered,
}

impl InboundKind {
    pub const ALL: [Self; 12] = [
        Self::StateChange,
        Self::AdvertisingStarted,
        Self::AdvertisingStopped,
        Self::Discovered,
        Self::Connected,
        Self::Disconnected,
        Self::MtuChanged,
        Self::ServicesDiscovered,
        Self::RssiUpdated,
        Self::CharacteristicsDiscovered,
        Self::CharacteristicValue,
        Self::DescriptorsDiscovered,
    ];
}

/// Which daemon message-id table to decode against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolRevision {
    /// Older daemons: 54 = rssi update, 55 = services discovered.
    Legacy,
    /// 54 = services discovered, 55 = rssi update.
    #[default]
    Current,
}

impl ProtocolRevision {
    /// Map a raw inbound message id to its kind, `None` if unsupported.
    pub fn inbound(self, id: u32) -> Option<InboundKind> {
        let kind = match (self, id) {
            (_, 6) => InboundKind::StateChange,
            (_, 16) => InboundKind::AdvertisingStarted,
            (_, 17) => InboundKind::AdvertisingStopped,
            (_, 37) => InboundKind::Discovered,
            (_, 38) => InboundKind::Connected,
            (_, 40) => InboundKind::Disconnected,
            (_, 53) => InboundKind::MtuChanged,
            (Self::Current, 54) | (Self::Legacy, 55) => InboundKind::ServicesDiscovered,
            (Self::Current, 55) | (Self::Legacy, 54) => InboundKind::RssiUpdated,
            (_, 63) => InboundKind::CharacteristicsDiscovered,
            (_, 70) => InboundKind::CharacteristicValue,
            (_, 75) => InboundKind::DescriptorsDiscovered,
            _ => return None,
        };
        Some(kind)
    }

    /// Inverse of [`inbound`](Self::inbound).
    pub fn inbound_id(self, kind: InboundKind) -> u32 {
        match kind {
            InboundKind::StateChange => 6,
            InboundKind::AdvertisingStarted => 16,
            InboundKind::AdvertisingStopped => 17,
            InboundKind::Discovered => 37,
            InboundKind::Connected => 38,
            InboundKind::Disconnected => 40,
            InboundKind::MtuChanged => 53,
            InboundKind::ServicesDiscovered => match self {
                Self::Current => 54,
                Self::Legacy => 55,
            },
            InboundKind::RssiUpdated => match self {
                Self::Current => 55,
                Self::Legacy => 54,
            },
            InboundKind::CharacteristicsDiscovered => 63,
            InboundKind::CharacteristicValue => 70,
            InboundKind::DescriptorsDiscovered => 75,
        }
    }
}
