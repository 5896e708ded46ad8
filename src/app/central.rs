//! The command surface of a session.
//!
//! [`Central`] owns the directory, the published attribute table, the scan
//! flag, the configuration and the transport. Event handlers receive
//! `&mut Central` so they can issue follow-up commands.
//!
//! Refused commands (unknown peripheral, service or characteristic) are
//! logged and returned as errors; nothing is sent.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};
use uuid::Uuid;

use crate::beacon::IBeacon;
use crate::config::SessionConfig;
use crate::directory::Directory;
use crate::error::{Error, Result};
use crate::gatt::{GattUuid, LocalService, PublishedAttribute};
use crate::wire::{Message, Transport};

use super::commands::{self, Publication};

pub struct Central<T> {
    config: SessionConfig,
    transport: T,
    pub(crate) directory: Directory,
    published: Vec<PublishedAttribute>,
    last_service_attribute_id: u32,
    pub(crate) allow_duplicates: bool,
}

impl<T: Transport> Central<T> {
    pub fn new(transport: T, config: SessionConfig) -> Self {
        Self {
            config,
            transport,
            directory: Directory::new(),
            published: Vec::new(),
            last_service_attribute_id: 0,
            allow_duplicates: false,
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Flag recorded by the last [`start_scanning`](Self::start_scanning).
    pub fn allow_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    /// Published attribute by id (ids start at 1).
    pub fn published(&self, attribute_id: u32) -> Option<&PublishedAttribute> {
        let index = usize::try_from(attribute_id.checked_sub(1)?).ok()?;
        self.published.get(index)
    }

    pub fn published_len(&self) -> usize {
        self.published.len()
    }

    pub fn last_service_attribute_id(&self) -> u32 {
        self.last_service_attribute_id
    }

    // ── Transport ─────────────────────────────────────────────

    fn send(&mut self, message: &Message) -> Result<()> {
        if self.config.verbose {
            info!("send: {} {:?}", message.id, message.args);
        } else {
            debug!("send: {}", message.id);
        }
        self.transport
            .send(message)
            .map_err(|e| Error::Transport(e.to_string()))
    }

    fn send_resolved(&mut self, what: &str, message: Result<Message>) -> Result<()> {
        match message {
            Ok(m) => self.send(&m),
            Err(e) => {
                warn!("{what}: {e}");
                Err(e)
            }
        }
    }

    // ── Session commands ──────────────────────────────────────

    pub fn init(&mut self) -> Result<()> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        self.send(&commands::init(&self.config, secs))
    }

    pub fn start_advertising(&mut self, name: &str, services: &[GattUuid]) -> Result<()> {
        self.send(&commands::start_advertising(name, services))
    }

    /// Advertise as an iBeacon in the configured layout.
    pub fn start_advertising_ibeacon(&mut self, beacon: &IBeacon) -> Result<()> {
        let m = commands::start_advertising_ibeacon(beacon, self.config.beacon_format);
        self.send(&m)
    }

    /// Advertise a caller-built beacon payload in the configured layout.
    pub fn start_advertising_ibeacon_data(&mut self, data: &[u8]) -> Result<()> {
        let m = commands::start_advertising_ibeacon_data(data, self.config.beacon_format);
        self.send_resolved("start_advertising_ibeacon_data", m)
    }

    pub fn stop_advertising(&mut self) -> Result<()> {
        self.send(&commands::stop_advertising())
    }

    /// Start scanning and record `allow_duplicates` for the dispatcher.
    pub fn start_scanning(&mut self, services: &[GattUuid], allow_duplicates: bool) -> Result<()> {
        self.allow_duplicates = allow_duplicates;
        self.send(&commands::start_scanning(services, allow_duplicates))
    }

    pub fn stop_scanning(&mut self) -> Result<()> {
        self.send(&commands::stop_scanning())
    }

    // ── Peripheral commands ───────────────────────────────────

    pub fn connect(&mut self, peripheral: Uuid) -> Result<()> {
        let m = commands::connect(&self.directory, peripheral);
        self.send_resolved("connect", m)
    }

    pub fn disconnect(&mut self, peripheral: Uuid) -> Result<()> {
        let m = commands::disconnect(&self.directory, peripheral);
        self.send_resolved("disconnect", m)
    }

    pub fn update_rssi(&mut self, peripheral: Uuid) -> Result<()> {
        let m = commands::update_rssi(&self.directory, peripheral);
        self.send_resolved("update_rssi", m)
    }

    pub fn discover_services(&mut self, peripheral: Uuid, filter: &[GattUuid]) -> Result<()> {
        let m = commands::discover_services(&self.directory, peripheral, filter);
        self.send_resolved("discover_services", m)
    }

    pub fn discover_characteristics(
        &mut self,
        peripheral: Uuid,
        service: GattUuid,
        filter: &[GattUuid],
    ) -> Result<()> {
        let m = commands::discover_characteristics(&self.directory, peripheral, service, filter);
        self.send_resolved("discover_characteristics", m)
    }

    pub fn read(
        &mut self,
        peripheral: Uuid,
        service: GattUuid,
        characteristic: GattUuid,
    ) -> Result<()> {
        let m = commands::read(&self.directory, peripheral, service, characteristic);
        self.send_resolved("read", m)
    }

    pub fn discover_descriptors(
        &mut self,
        peripheral: Uuid,
        service: GattUuid,
        characteristic: GattUuid,
    ) -> Result<()> {
        let m =
            commands::discover_descriptors(&self.directory, peripheral, service, characteristic);
        self.send_resolved("discover_descriptors", m)
    }

    // ── Local GATT server ─────────────────────────────────────

    /// Replace the published GATT server with `services`.
    pub fn set_services(&mut self, services: &[LocalService]) -> Result<()> {
        let Publication {
            messages,
            attributes,
            last_service_attribute_id,
        } = commands::publish(services);
        self.published = attributes;
        self.last_service_attribute_id = last_service_attribute_id;
        for m in &messages {
            self.send(m)?;
        }
        Ok(())
    }

    pub fn remove_all_services(&mut self) -> Result<()> {
        self.published.clear();
        self.last_service_attribute_id = 0;
        self.send(&commands::remove_all_services())
    }
}
