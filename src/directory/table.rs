//! Arena with a UUID key and any number of numeric handle aliases.
//!
//! One slot per entity; the UUID index and every handle alias point at the
//! same slot, so a lookup by any key yields the identical object.

use std::collections::HashMap;

use crate::gatt::GattUuid;

#[derive(Debug, Clone)]
pub struct AliasTable<T> {
    slots: Vec<T>,
    by_uuid: HashMap<GattUuid, usize>,
    by_handle: HashMap<u16, usize>,
}

impl<T> Default for AliasTable<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            by_uuid: HashMap::new(),
            by_handle: HashMap::new(),
        }
    }
}

impl<T> AliasTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `uuid`, aliased by `handles`.
    ///
    /// An existing entry with the same UUID is replaced in its slot and its
    /// old handle aliases are dropped. Returns the slot index.
    pub fn insert(&mut self, uuid: GattUuid, handles: &[u16], value: T) -> usize {
        let slot = if let Some(&slot) = self.by_uuid.get(&uuid) {
            self.slots[slot] = value;
            self.by_handle.retain(|_, s| *s != slot);
            slot
        } else {
            self.slots.push(value);
            let slot = self.slots.len() - 1;
            self.by_uuid.insert(uuid, slot);
            slot
        };
        for &handle in handles {
            self.by_handle.insert(handle, slot);
        }
        slot
    }

    pub fn get(&self, uuid: GattUuid) -> Option<&T> {
        self.by_uuid.get(&uuid).map(|&slot| &self.slots[slot])
    }

    pub fn get_mut(&mut self, uuid: GattUuid) -> Option<&mut T> {
        self.by_uuid.get(&uuid).map(|&slot| &mut self.slots[slot])
    }

    pub fn by_handle(&self, handle: u16) -> Option<&T> {
        self.by_handle.get(&handle).map(|&slot| &self.slots[slot])
    }

    pub fn by_handle_mut(&mut self, handle: u16) -> Option<&mut T> {
        self.by_handle.get(&handle).map(|&slot| &mut self.slots[slot])
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.slots.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.by_uuid.clear();
        self.by_handle.clear();
    }
}

impl<'a, T> IntoIterator for &'a AliasTable<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
