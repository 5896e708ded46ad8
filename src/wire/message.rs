//! Opcode-tagged message envelope and the argument key vocabulary.
//!
//! On the wire every message is a dictionary of the form
//!
//! ```text
//! { kCBMsgId: <int>, kCBMsgArgs: { ...opcode-specific... } }
//! ```
//!
//! Capture files store one [`Message`] per line as `{"id":..,"args":{..}}`.

use serde::{Deserialize, Serialize};

use super::value::{Dict, Value};
use crate::error::DecodeError;

/// Envelope key carrying the opcode.
pub const MSG_ID: &str = "kCBMsgId";
/// Envelope key carrying the argument dictionary.
pub const MSG_ARGS: &str = "kCBMsgArgs";

/// Argument keys shared by the dispatcher and the command encoder.
pub mod keys {
    pub const STATE: &str = "kCBMsgArgState";
    pub const RESULT: &str = "kCBMsgArgResult";
    pub const NAME: &str = "kCBMsgArgName";
    pub const TYPE: &str = "kCBMsgArgType";
    pub const OPTIONS: &str = "kCBMsgArgOptions";
    pub const UUID: &str = "kCBMsgArgUUID";
    pub const UUIDS: &str = "kCBMsgArgUUIDs";
    pub const DATA: &str = "kCBMsgArgData";
    pub const DEVICE_UUID: &str = "kCBMsgArgDeviceUUID";
    pub const RSSI: &str = "kCBMsgArgRssi";
    pub const ATT_MTU: &str = "kCBMsgArgATTMTU";
    pub const ADVERTISEMENT_DATA: &str = "kCBMsgArgAdvertisementData";
    pub const SERVICES: &str = "kCBMsgArgServices";
    pub const SERVICE_START_HANDLE: &str = "kCBMsgArgServiceStartHandle";
    pub const SERVICE_END_HANDLE: &str = "kCBMsgArgServiceEndHandle";
    pub const CHARACTERISTICS: &str = "kCBMsgArgCharacteristics";
    pub const CHARACTERISTIC_HANDLE: &str = "kCBMsgArgCharacteristicHandle";
    pub const CHARACTERISTIC_VALUE_HANDLE: &str = "kCBMsgArgCharacteristicValueHandle";
    pub const CHARACTERISTIC_PROPERTIES: &str = "kCBMsgArgCharacteristicProperties";
    pub const DESCRIPTORS: &str = "kCBMsgArgDescriptors";
    pub const DESCRIPTOR_HANDLE: &str = "kCBMsgArgDescriptorHandle";
    pub const IS_NOTIFICATION: &str = "kCBMsgArgIsNotification";
    pub const ATTRIBUTE_ID: &str = "kCBMsgArgAttributeID";
    pub const ATTRIBUTE_IDS: &str = "kCBMsgArgAttributeIDs";
    pub const ATTRIBUTE_PERMISSIONS: &str = "kCBMsgArgAttributePermissions";

    pub const ADV_LOCAL_NAME: &str = "kCBAdvDataLocalName";
    pub const ADV_TX_POWER_LEVEL: &str = "kCBAdvDataTxPowerLevel";
    pub const ADV_MANUFACTURER_DATA: &str = "kCBAdvDataManufacturerData";
    pub const ADV_SERVICE_UUIDS: &str = "kCBAdvDataServiceUUIDs";
    pub const ADV_SERVICE_DATA: &str = "kCBAdvDataServiceData";
    pub const ADV_IS_CONNECTABLE: &str = "kCBAdvDataIsConnectable";
    pub const ADV_APPLE_BEACON_KEY: &str = "kCBAdvDataAppleBeaconKey";
    pub const ADV_APPLE_MFG_DATA: &str = "kCBAdvDataAppleMfgData";

    pub const INIT_SHOW_POWER_ALERT: &str = "kCBInitOptionShowPowerAlert";
    pub const SCAN_ALLOW_DUPLICATES: &str = "kCBScanOptionAllowDuplicates";
    pub const CONNECT_NOTIFY_ON_DISCONNECTION: &str = "kCBConnectOptionNotifyOnDisconnection";
}

/// One opcode-tagged message, inbound or outbound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u32,
    #[serde(default)]
    pub args: Dict,
}

impl Message {
    pub fn new(id: u32, args: Dict) -> Self {
        Self { id, args }
    }

    /// A message whose argument block is empty (the daemon's `nil`).
    pub fn bare(id: u32) -> Self {
        Self::new(id, Dict::new())
    }

    /// Unwrap the `{kCBMsgId, kCBMsgArgs}` envelope.
    ///
    /// A missing argument block decodes as an empty dictionary.
    pub fn from_envelope(envelope: &Dict) -> Result<Self, DecodeError> {
        let id = envelope.int_as::<u32>(MSG_ID)?;
        let args = match envelope.get(MSG_ARGS) {
            None => Dict::new(),
            Some(Value::Dict(d)) => d.clone(),
            Some(_) => {
                return Err(DecodeError::WrongType {
                    key: MSG_ARGS,
                    expected: "dict",
                });
            }
        };
        Ok(Self { id, args })
    }

    /// Wrap into the `{kCBMsgId, kCBMsgArgs}` envelope.
    pub fn to_envelope(&self) -> Dict {
        Dict::new()
            .with(MSG_ID, self.id)
            .with(MSG_ARGS, self.args.clone())
    }
}
