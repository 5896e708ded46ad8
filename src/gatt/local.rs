//! Locally published GATT server definitions.

use super::identifier::GattUuid;
use super::properties::Properties;

/// A descriptor attached to a published characteristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDescriptor {
    pub uuid: GattUuid,
    pub value: Vec<u8>,
}

impl LocalDescriptor {
    pub fn new(uuid: GattUuid, value: impl Into<Vec<u8>>) -> Self {
        Self {
            uuid,
            value: value.into(),
        }
    }
}

/// A characteristic to publish.
///
/// `secure` is a subset of `properties` naming the capabilities that need
/// an encrypted link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCharacteristic {
    pub uuid: GattUuid,
    pub properties: Properties,
    pub secure: Properties,
    pub value: Vec<u8>,
    pub descriptors: Vec<LocalDescriptor>,
}

impl LocalCharacteristic {
    pub fn new(uuid: GattUuid, properties: Properties) -> Self {
        Self {
            uuid,
            properties,
            secure: Properties::empty(),
            value: Vec::new(),
            descriptors: Vec::new(),
        }
    }

    #[must_use]
    pub fn secure(mut self, secure: Properties) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub fn descriptor(mut self, descriptor: LocalDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }
}

/// A primary service to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalService {
    pub uuid: GattUuid,
    pub characteristics: Vec<LocalCharacteristic>,
}

impl LocalService {
    pub fn new(uuid: GattUuid) -> Self {
        Self {
            uuid,
            characteristics: Vec::new(),
        }
    }

    #[must_use]
    pub fn characteristic(mut self, characteristic: LocalCharacteristic) -> Self {
        self.characteristics.push(characteristic);
        self
    }
}

/// One entry of the published attribute table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishedAttribute {
    Service(LocalService),
    Characteristic(LocalCharacteristic),
}

impl PublishedAttribute {
    pub fn uuid(&self) -> GattUuid {
        match self {
            Self::Service(s) => s.uuid,
            Self::Characteristic(c) => c.uuid,
        }
    }
}
