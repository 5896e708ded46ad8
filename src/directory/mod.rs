//! Entity directory: peripheral → service → characteristic → descriptor.
//!
//! Each level is an [`AliasTable`]: one arena slot per entity, reachable
//! by UUID and by every numeric handle the daemon uses for it. The
//! dispatcher is the only writer; the command encoder only reads.
//!
//! ```text
//! Directory
//!  └─ Peripheral (by device Uuid)
//!      └─ Service         (uuid | start handle)
//!          └─ Characteristic  (uuid | handle | value handle)
//!              └─ Descriptor      (uuid | handle)
//! ```

pub mod advertisement;
pub mod table;

use std::collections::HashMap;

use uuid::Uuid;

use crate::gatt::{GattUuid, KnownAttribute, Properties, known};

pub use advertisement::{Advertisement, ServiceData};
pub use table::AliasTable;

// ───────────────────────────────────────────────────────────────
// Entities
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub uuid: GattUuid,
    pub handle: u16,
    pub known: Option<KnownAttribute>,
}

impl Descriptor {
    pub fn new(uuid: GattUuid, handle: u16) -> Self {
        Self {
            uuid,
            handle,
            known: None,
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        self.known.map(|k| k.name)
    }
}

#[derive(Debug, Clone)]
pub struct Characteristic {
    pub uuid: GattUuid,
    pub handle: u16,
    pub value_handle: u16,
    pub properties: Properties,
    pub known: Option<KnownAttribute>,
    pub descriptors: AliasTable<Descriptor>,
}

impl Characteristic {
    pub fn new(uuid: GattUuid, handle: u16, value_handle: u16, properties: Properties) -> Self {
        Self {
            uuid,
            handle,
            value_handle,
            properties,
            known: None,
            descriptors: AliasTable::new(),
        }
    }

    pub fn descriptor(&self, uuid: GattUuid) -> Option<&Descriptor> {
        self.descriptors.get(uuid)
    }

    pub fn descriptor_by_handle(&self, handle: u16) -> Option<&Descriptor> {
        self.descriptors.by_handle(handle)
    }

    pub fn name(&self) -> Option<&'static str> {
        self.known.map(|k| k.name)
    }
}

#[derive(Debug, Clone)]
pub struct Service {
    pub uuid: GattUuid,
    pub start_handle: u16,
    pub end_handle: u16,
    pub known: Option<KnownAttribute>,
    pub characteristics: AliasTable<Characteristic>,
}

impl Service {
    pub fn new(uuid: GattUuid, start_handle: u16, end_handle: u16) -> Self {
        Self {
            uuid,
            start_handle,
            end_handle,
            known: None,
            characteristics: AliasTable::new(),
        }
    }

    pub fn characteristic(&self, uuid: GattUuid) -> Option<&Characteristic> {
        self.characteristics.get(uuid)
    }

    pub fn characteristic_by_handle(&self, handle: u16) -> Option<&Characteristic> {
        self.characteristics.by_handle(handle)
    }

    pub fn name(&self) -> Option<&'static str> {
        self.known.map(|k| k.name)
    }
}

#[derive(Debug, Clone)]
pub struct Peripheral {
    pub id: Uuid,
    pub advertisement: Advertisement,
    pub rssi: i32,
    pub connectable: bool,
    pub services: AliasTable<Service>,
}

impl Peripheral {
    pub fn service(&self, uuid: GattUuid) -> Option<&Service> {
        self.services.get(uuid)
    }

    pub fn service_by_handle(&self, start_handle: u16) -> Option<&Service> {
        self.services.by_handle(start_handle)
    }

    /// Owning service and characteristic for a characteristic or value handle.
    pub fn characteristic_by_handle(&self, handle: u16) -> Option<(&Service, &Characteristic)> {
        self.services.iter().find_map(|service| {
            service
                .characteristic_by_handle(handle)
                .map(|characteristic| (service, characteristic))
        })
    }

    fn characteristic_by_handle_mut(&mut self, handle: u16) -> Option<&mut Characteristic> {
        self.services
            .iter_mut()
            .find_map(|service| service.characteristics.by_handle_mut(handle))
    }
}

/// How a discovery sighting related to what was already known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sighting {
    /// First time this peripheral was seen.
    New,
    /// Known peripheral with a different advertisement.
    Changed,
    /// Known peripheral, same advertisement.
    Repeated,
}

impl Sighting {
    pub fn is_new(self) -> bool {
        self == Self::New
    }
}

// ───────────────────────────────────────────────────────────────
// Directory
// ───────────────────────────────────────────────────────────────

/// Every peripheral seen during a session. Peripherals are never removed.
#[derive(Debug, Default)]
pub struct Directory {
    peripherals: Vec<Peripheral>,
    index: HashMap<Uuid, usize>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peripheral(&self, id: Uuid) -> Option<&Peripheral> {
        self.index.get(&id).map(|&slot| &self.peripherals[slot])
    }

    fn peripheral_mut(&mut self, id: Uuid) -> Option<&mut Peripheral> {
        self.index.get(&id).map(|&slot| &mut self.peripherals[slot])
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.index.contains_key(&id)
    }

    /// Peripherals in discovery order.
    pub fn peripherals(&self) -> impl Iterator<Item = &Peripheral> {
        self.peripherals.iter()
    }

    pub fn len(&self) -> usize {
        self.peripherals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peripherals.is_empty()
    }

    /// Record a discovery sighting.
    ///
    /// A known peripheral keeps its slot and services; advertisement, rssi
    /// and connectable flag are replaced in place.
    pub fn upsert_peripheral(
        &mut self,
        id: Uuid,
        advertisement: Advertisement,
        rssi: i32,
        connectable: bool,
    ) -> (&Peripheral, Sighting) {
        if let Some(&slot) = self.index.get(&id) {
            let p = &mut self.peripherals[slot];
            let sighting = if p.advertisement == advertisement {
                Sighting::Repeated
            } else {
                Sighting::Changed
            };
            p.advertisement = advertisement;
            p.rssi = rssi;
            p.connectable = connectable;
            return (&self.peripherals[slot], sighting);
        }

        self.peripherals.push(Peripheral {
            id,
            advertisement,
            rssi,
            connectable,
            services: AliasTable::new(),
        });
        let slot = self.peripherals.len() - 1;
        self.index.insert(id, slot);
        (&self.peripherals[slot], Sighting::New)
    }

    /// Replace a peripheral's service directory wholesale.
    pub fn set_services(&mut self, id: Uuid, services: Vec<Service>) -> Option<&Peripheral> {
        let p = self.peripheral_mut(id)?;
        p.services.clear();
        for mut service in services {
            service.known = known::service(service.uuid);
            p.services
                .insert(service.uuid, &[service.start_handle], service);
        }
        Some(&*p)
    }

    /// Replace the characteristics of the service starting at `start_handle`.
    pub fn set_characteristics(
        &mut self,
        id: Uuid,
        start_handle: u16,
        characteristics: Vec<Characteristic>,
    ) -> Option<&Service> {
        let service = self
            .peripheral_mut(id)?
            .services
            .by_handle_mut(start_handle)?;
        service.characteristics.clear();
        for mut c in characteristics {
            c.known = known::characteristic(c.uuid);
            service
                .characteristics
                .insert(c.uuid, &[c.handle, c.value_handle], c);
        }
        Some(&*service)
    }

    /// Replace the descriptors of the characteristic at `handle`.
    pub fn set_descriptors(
        &mut self,
        id: Uuid,
        handle: u16,
        descriptors: Vec<Descriptor>,
    ) -> Option<&Characteristic> {
        let characteristic = self.peripheral_mut(id)?.characteristic_by_handle_mut(handle)?;
        characteristic.descriptors.clear();
        for mut d in descriptors {
            d.known = known::descriptor(d.uuid);
            characteristic.descriptors.insert(d.uuid, &[d.handle], d);
        }
        Some(&*characteristic)
    }

    pub fn update_rssi(&mut self, id: Uuid, rssi: i32) -> Option<&Peripheral> {
        let p = self.peripheral_mut(id)?;
        p.rssi = rssi;
        Some(&*p)
    }
}
