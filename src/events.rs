//! Domain events produced by the dispatcher.
//!
//! Events carry identifiers plus the data that triggered them; handlers that
//! need the full entity look it up in the directory through the central.

use core::fmt;
use core::str::FromStr;

use uuid::Uuid;

use crate::directory::Advertisement;
use crate::error::Error;
use crate::gatt::GattUuid;
use crate::wire::TransportFault;

/// Adapter power state, in daemon index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterState {
    Unknown,
    Resetting,
    Unsupported,
    Unauthorized,
    PoweredOff,
    PoweredOn,
}

impl AdapterState {
    const ALL: [Self; 6] = [
        Self::Unknown,
        Self::Resetting,
        Self::Unsupported,
        Self::Unauthorized,
        Self::PoweredOff,
        Self::PoweredOn,
    ];

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Resetting => "resetting",
            Self::Unsupported => "unsupported",
            Self::Unauthorized => "unauthorized",
            Self::PoweredOff => "poweredOff",
            Self::PoweredOn => "poweredOn",
        }
    }
}

impl fmt::Display for AdapterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured events emitted by the protocol engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StateChange(AdapterState),

    AdvertisingStart,
    AdvertisingStop,

    /// A peripheral was sighted (subject to the duplicate policy).
    Discover {
        peripheral: Uuid,
        advertisement: Advertisement,
        rssi: i32,
        connectable: bool,
    },

    Connect { peripheral: Uuid },
    Disconnect { peripheral: Uuid },

    MtuChange { peripheral: Uuid, mtu: u16 },

    ServicesDiscover {
        peripheral: Uuid,
        services: Vec<GattUuid>,
    },

    CharacteristicsDiscover {
        peripheral: Uuid,
        service: GattUuid,
        characteristics: Vec<GattUuid>,
    },

    DescriptorsDiscover {
        peripheral: Uuid,
        service: GattUuid,
        characteristic: GattUuid,
        descriptors: Vec<GattUuid>,
    },

    /// A read response, or a notification when `is_notification` is set.
    Read {
        peripheral: Uuid,
        service: GattUuid,
        characteristic: GattUuid,
        data: Vec<u8>,
        is_notification: bool,
    },

    RssiUpdate { peripheral: Uuid, rssi: i32 },

    /// Link-level advisory from the transport.
    ConnectionFault(TransportFault),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::StateChange(_) => EventKind::StateChange,
            Self::AdvertisingStart => EventKind::AdvertisingStart,
            Self::AdvertisingStop => EventKind::AdvertisingStop,
            Self::Discover { .. } => EventKind::Discover,
            Self::Connect { .. } => EventKind::Connect,
            Self::Disconnect { .. } => EventKind::Disconnect,
            Self::MtuChange { .. } => EventKind::MtuChange,
            Self::ServicesDiscover { .. } => EventKind::ServicesDiscover,
            Self::CharacteristicsDiscover { .. } => EventKind::CharacteristicsDiscover,
            Self::DescriptorsDiscover { .. } => EventKind::DescriptorsDiscover,
            Self::Read { .. } => EventKind::Read,
            Self::RssiUpdate { .. } => EventKind::RssiUpdate,
            Self::ConnectionFault(_) => EventKind::ConnectionFault,
        }
    }

    /// The peripheral this event concerns, if any.
    pub fn peripheral(&self) -> Option<Uuid> {
        match self {
            Self::Discover { peripheral, .. }
            | Self::Connect { peripheral }
            | Self::Disconnect { peripheral }
            | Self::MtuChange { peripheral, .. }
            | Self::ServicesDiscover { peripheral, .. }
            | Self::CharacteristicsDiscover { peripheral, .. }
            | Self::DescriptorsDiscover { peripheral, .. }
            | Self::Read { peripheral, .. }
            | Self::RssiUpdate { peripheral, .. } => Some(*peripheral),
            Self::StateChange(_)
            | Self::AdvertisingStart
            | Self::AdvertisingStop
            | Self::ConnectionFault(_) => None,
        }
    }
}

/// Subscription key: one per [`Event`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    StateChange,
    AdvertisingStart,
    AdvertisingStop,
    Discover,
    Connect,
    Disconnect,
    MtuChange,
    ServicesDiscover,
    CharacteristicsDiscover,
    DescriptorsDiscover,
    Read,
    RssiUpdate,
    ConnectionFault,
}

/// Name of the catch-all subscription.
pub const ALL_EVENTS: &str = "__allEvents__";

impl EventKind {
    pub const ALL: [Self; 13] = [
        Self::StateChange,
        Self::AdvertisingStart,
        Self::AdvertisingStop,
        Self::Discover,
        Self::Connect,
        Self::Disconnect,
        Self::MtuChange,
        Self::ServicesDiscover,
        Self::CharacteristicsDiscover,
        Self::DescriptorsDiscover,
        Self::Read,
        Self::RssiUpdate,
        Self::ConnectionFault,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::StateChange => "stateChange",
            Self::AdvertisingStart => "advertisingStart",
            Self::AdvertisingStop => "advertisingStop",
            Self::Discover => "discover",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::MtuChange => "mtuChange",
            Self::ServicesDiscover => "servicesDiscover",
            Self::CharacteristicsDiscover => "characteristicsDiscover",
            Self::DescriptorsDiscover => "descriptorsDiscover",
            Self::Read => "read",
            Self::RssiUpdate => "rssiUpdate",
            Self::ConnectionFault => "connectionFault",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown names are rejected; the wildcard is not a kind (see [`ALL_EVENTS`]).
impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| Error::UnknownEvent(s.to_owned()))
    }
}
