//! GATT vocabulary: attribute identifiers, the capability codec, static
//! name tables and local server definitions.

pub mod identifier;
pub mod known;
pub mod local;
pub mod properties;

pub use identifier::GattUuid;
pub use known::KnownAttribute;
pub use local::{LocalCharacteristic, LocalDescriptor, LocalService, PublishedAttribute};
pub use properties::{LocalEncoding, Properties, encode_local};
