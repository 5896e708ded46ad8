//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every domain event to the `log`
//! facade in a compact `KIND | field=value` form.

use log::info;

use crate::app::ports::EventSink;
use crate::events::Event;

/// Adapter that logs every [`Event`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &Event) {
        match event {
            Event::StateChange(state) => info!("STATE | {state}"),
            Event::AdvertisingStart => info!("ADV | started"),
            Event::AdvertisingStop => info!("ADV | stopped"),
            Event::Discover {
                peripheral,
                advertisement,
                rssi,
                connectable,
            } => info!(
                "DISCOVER | id={} | name={:?} | rssi={} | tx={} | connectable={} | services={}",
                peripheral,
                advertisement.local_name,
                rssi,
                advertisement.tx_power_level,
                connectable,
                advertisement.service_uuids.len(),
            ),
            Event::Connect { peripheral } => info!("CONNECT | id={peripheral}"),
            Event::Disconnect { peripheral } => info!("DISCONNECT | id={peripheral}"),
            Event::MtuChange { peripheral, mtu } => info!("MTU | id={peripheral} | mtu={mtu}"),
            Event::ServicesDiscover {
                peripheral,
                services,
            } => info!("SERVICES | id={} | count={}", peripheral, services.len()),
            Event::CharacteristicsDiscover {
                peripheral,
                service,
                characteristics,
            } => info!(
                "CHARACTERISTICS | id={} | service={} | count={}",
                peripheral,
                service,
                characteristics.len()
            ),
            Event::DescriptorsDiscover {
                peripheral,
                characteristic,
                descriptors,
                ..
            } => info!(
                "DESCRIPTORS | id={} | characteristic={} | count={}",
                peripheral,
                characteristic,
                descriptors.len()
            ),
            Event::Read {
                peripheral,
                characteristic,
                data,
                is_notification,
                ..
            } => info!(
                "{} | id={} | characteristic={} | data={}",
                if *is_notification { "NOTIFY" } else { "READ" },
                peripheral,
                characteristic,
                hex::encode(data),
            ),
            Event::RssiUpdate { peripheral, rssi } => info!("RSSI | id={peripheral} | rssi={rssi}"),
            Event::ConnectionFault(fault) => info!("FAULT | {fault}"),
        }
    }
}
