//! iBeacon payload codec.
//!
//! Payload layout (21 bytes):
//! ```text
//! ┌───────────────┬────────────┬────────────┬──────────────┐
//! │ proximity UUID│ major (BE) │ minor (BE) │ meas. power  │
//! │ 16 B          │ 2 B        │ 2 B        │ i8           │
//! └───────────────┴────────────┴────────────┴──────────────┘
//! ```
//!
//! Older daemons take the bare payload under `kCBAdvDataAppleBeaconKey`.
//! Newer ones take a full manufacturer AD structure under
//! `kCBAdvDataAppleMfgData`:
//! ```text
//! [len+5, 0xFF, 0x4C, 0x00, 0x02, len] ‖ payload
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DecodeError;
use crate::wire::keys;

/// Length of an encoded iBeacon payload.
pub const PAYLOAD_LEN: usize = 21;

/// Largest legacy advertising data block.
const MAX_AD_LEN: usize = 31;
const FRAME_HEADER_LEN: usize = 6;

const AD_TYPE_MANUFACTURER: u8 = 0xff;
const APPLE_COMPANY_ID: [u8; 2] = [0x4c, 0x00];
const IBEACON_TYPE: u8 = 0x02;

/// Manufacturer frame, at most one advertising data block long.
pub type Frame = heapless::Vec<u8, MAX_AD_LEN>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IBeacon {
    pub uuid: Uuid,
    pub major: u16,
    pub minor: u16,
    pub measured_power: i8,
}

impl IBeacon {
    pub fn new(uuid: Uuid, major: u16, minor: u16, measured_power: i8) -> Self {
        Self {
            uuid,
            major,
            minor,
            measured_power,
        }
    }

    pub fn payload(&self) -> [u8; PAYLOAD_LEN] {
        let mut out = [0u8; PAYLOAD_LEN];
        out[..16].copy_from_slice(self.uuid.as_bytes());
        out[16..18].copy_from_slice(&self.major.to_be_bytes());
        out[18..20].copy_from_slice(&self.minor.to_be_bytes());
        out[20] = self.measured_power.to_be_bytes()[0];
        out
    }

    pub fn from_payload(payload: &[u8]) -> Result<Self, DecodeError> {
        let bytes: &[u8; PAYLOAD_LEN] = payload
            .try_into()
            .map_err(|_| DecodeError::Beacon("payload must be 21 bytes"))?;
        let mut uuid = [0u8; 16];
        uuid.copy_from_slice(&bytes[..16]);
        Ok(Self {
            uuid: Uuid::from_bytes(uuid),
            major: u16::from_be_bytes([bytes[16], bytes[17]]),
            minor: u16::from_be_bytes([bytes[18], bytes[19]]),
            measured_power: i8::from_be_bytes([bytes[20]]),
        })
    }

    /// Full manufacturer AD structure carrying this beacon.
    pub fn manufacturer_frame(&self) -> Frame {
        frame(&self.payload()).expect("6 + 21 bytes fits one advertising block")
    }

    /// Recover a beacon from any of the layouts it travels in: the bare
    /// payload, the AD frame, or scan-report manufacturer data
    /// (`4c 00 02 15 ‖ payload`).
    pub fn from_manufacturer_data(data: &[u8]) -> Result<Self, DecodeError> {
        match data.len() {
            PAYLOAD_LEN => Self::from_payload(data),
            n if n == PAYLOAD_LEN + FRAME_HEADER_LEN => {
                let (header, payload) = data.split_at(FRAME_HEADER_LEN);
                if header != frame_header(PAYLOAD_LEN as u8) {
                    return Err(DecodeError::Beacon("not an Apple iBeacon frame"));
                }
                Self::from_payload(payload)
            }
            n if n == PAYLOAD_LEN + 4 => {
                let (header, payload) = data.split_at(4);
                if header[..2] != APPLE_COMPANY_ID
                    || header[2] != IBEACON_TYPE
                    || header[3] as usize != PAYLOAD_LEN
                {
                    return Err(DecodeError::Beacon("not Apple iBeacon manufacturer data"));
                }
                Self::from_payload(payload)
            }
            _ => Err(DecodeError::Beacon("unrecognised beacon layout")),
        }
    }
}

fn frame_header(len: u8) -> [u8; FRAME_HEADER_LEN] {
    [
        len + 5,
        AD_TYPE_MANUFACTURER,
        APPLE_COMPANY_ID[0],
        APPLE_COMPANY_ID[1],
        IBEACON_TYPE,
        len,
    ]
}

/// Wrap an arbitrary payload in the manufacturer AD structure.
pub fn frame(payload: &[u8]) -> Result<Frame, DecodeError> {
    if payload.len() > MAX_AD_LEN - FRAME_HEADER_LEN {
        return Err(DecodeError::Beacon(
            "payload does not fit one advertising block",
        ));
    }
    let mut frame = Frame::new();
    frame
        .extend_from_slice(&frame_header(payload.len() as u8))
        .and_then(|()| frame.extend_from_slice(payload))
        .map_err(|()| DecodeError::Beacon("payload does not fit one advertising block"))?;
    Ok(frame)
}

/// Which advertisement layout the daemon expects for beacons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeaconFormat {
    /// Bare payload under `kCBAdvDataAppleBeaconKey`.
    #[default]
    BeaconKey,
    /// AD frame under `kCBAdvDataAppleMfgData`.
    ManufacturerData,
}

impl BeaconFormat {
    /// Pick the layout from a Darwin kernel release such as `"14.5.0"`.
    /// Release 14 and later take manufacturer data.
    pub fn for_darwin_release(release: &str) -> Self {
        let major = release
            .split('.')
            .next()
            .and_then(|m| m.trim().parse::<u32>().ok());
        match major {
            Some(m) if m >= 14 => Self::ManufacturerData,
            _ => Self::BeaconKey,
        }
    }

    /// Advertisement key the encoded bytes go under.
    pub fn key(self) -> &'static str {
        match self {
            Self::BeaconKey => keys::ADV_APPLE_BEACON_KEY,
            Self::ManufacturerData => keys::ADV_APPLE_MFG_DATA,
        }
    }

    /// Encode a caller-supplied payload in this layout.
    pub fn encode(self, payload: &[u8]) -> Result<Vec<u8>, DecodeError> {
        match self {
            Self::BeaconKey => Ok(payload.to_vec()),
            Self::ManufacturerData => frame(payload).map(|f| f.to_vec()),
        }
    }
}
