//! Session configuration.
//!
//! Everything a session needs to know up front. Loadable from JSON by the
//! CLI; every field has a default so partial files are accepted.

use serde::{Deserialize, Serialize};

use crate::beacon::BeaconFormat;
use crate::wire::ProtocolRevision;

/// When a repeat sighting of a known peripheral produces a discover event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Only when scanning with allow-duplicates.
    #[default]
    KnownPeripheral,
    /// Also whenever the advertisement differs from the stored one.
    AdvertisementChanged,
}

/// Core session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    // --- Identity ---
    /// Prefix of the client name sent on init (`<prefix>-<unix secs>`)
    pub client_name: String,
    /// Ask the OS to show its "Bluetooth is off" alert
    pub show_power_alert: bool,

    // --- Protocol ---
    /// Inbound opcode table to decode against
    pub revision: ProtocolRevision,
    /// Repeat-discovery reporting
    pub duplicate_policy: DuplicatePolicy,
    /// Layout for iBeacon advertising
    pub beacon_format: BeaconFormat,

    // --- Diagnostics ---
    /// Log every inbound and outbound message
    pub verbose: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            client_name: "blued-client".into(),
            show_power_alert: false,

            revision: ProtocolRevision::Current,
            duplicate_policy: DuplicatePolicy::KnownPeripheral,
            beacon_format: BeaconFormat::BeaconKey,

            verbose: false,
        }
    }
}
