//! Characteristic capability bitmask.
//!
//! Decoding a remote characteristic is a plain bit test. Encoding a local
//! characteristic for publication is not the inverse: read/write map onto
//! both a property bit and a permission bit, and "secure" notify/indicate
//! move to separate high property bits.
//!
//! | Capability               | Property bit        | Permission (plain / secure) |
//! |--------------------------|---------------------|-----------------------------|
//! | read                     | 0x02                | 0x01 / 0x04                 |
//! | write without response   | 0x04                | 0x02 / 0x08                 |
//! | write                    | 0x08                | 0x02 / 0x08                 |
//! | notify                   | 0x10 / 0x100 secure | none                        |
//! | indicate                 | 0x20 / 0x200 secure | none                        |

use core::fmt;
use core::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Set of characteristic capabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(u8);

impl Properties {
    pub const BROADCAST: Self = Self(0x01);
    pub const READ: Self = Self(0x02);
    pub const WRITE_WITHOUT_RESPONSE: Self = Self(0x04);
    pub const WRITE: Self = Self(0x08);
    pub const NOTIFY: Self = Self(0x10);
    pub const INDICATE: Self = Self(0x20);
    pub const AUTHENTICATED_SIGNED_WRITES: Self = Self(0x40);
    pub const EXTENDED_PROPERTIES: Self = Self(0x80);

    const NAMES: [(Self, &'static str); 8] = [
        (Self::BROADCAST, "broadcast"),
        (Self::READ, "read"),
        (Self::WRITE_WITHOUT_RESPONSE, "writeWithoutResponse"),
        (Self::WRITE, "write"),
        (Self::NOTIFY, "notify"),
        (Self::INDICATE, "indicate"),
        (Self::AUTHENTICATED_SIGNED_WRITES, "authenticatedSignedWrites"),
        (Self::EXTENDED_PROPERTIES, "extendedProperties"),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Decode the wire bitmask. Bits above 0x80 are ignored.
    pub fn from_bits(raw: i64) -> Self {
        Self((raw & 0xff) as u8)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn readable(self) -> bool {
        self.contains(Self::READ)
    }

    pub fn writable(self) -> bool {
        self.0 & (Self::WRITE.0 | Self::WRITE_WITHOUT_RESPONSE.0) != 0
    }

    pub fn notifiable(self) -> bool {
        self.0 & (Self::NOTIFY.0 | Self::INDICATE.0) != 0
    }

    /// Symbolic names of every set capability, lowest bit first.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for Properties {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Properties {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Local encoding
// ---------------------------------------------------------------------------

const PERM_READABLE: u32 = 0x01;
const PERM_WRITEABLE: u32 = 0x02;
const PERM_READ_ENCRYPTED: u32 = 0x04;
const PERM_WRITE_ENCRYPTED: u32 = 0x08;

const PROP_NOTIFY_ENCRYPTED: u32 = 0x100;
const PROP_INDICATE_ENCRYPTED: u32 = 0x200;

/// Property and permission words for one published characteristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalEncoding {
    pub properties: u32,
    pub permissions: u32,
}

/// Encode a local characteristic's capabilities.
///
/// `secure` marks which of the capabilities require an encrypted link; each
/// capability consults its own secure bit. Broadcast, signed writes and
/// extended properties have no local encoding and are dropped.
pub fn encode_local(properties: Properties, secure: Properties) -> LocalEncoding {
    let mut out = LocalEncoding::default();

    if properties.contains(Properties::READ) {
        out.properties |= u32::from(Properties::READ.0);
        out.permissions |= if secure.contains(Properties::READ) {
            PERM_READ_ENCRYPTED
        } else {
            PERM_READABLE
        };
    }

    for write in [Properties::WRITE_WITHOUT_RESPONSE, Properties::WRITE] {
        if properties.contains(write) {
            out.properties |= u32::from(write.0);
            out.permissions |= if secure.contains(write) {
                PERM_WRITE_ENCRYPTED
            } else {
                PERM_WRITEABLE
            };
        }
    }

    if properties.contains(Properties::NOTIFY) {
        out.properties |= if secure.contains(Properties::NOTIFY) {
            PROP_NOTIFY_ENCRYPTED
        } else {
            u32::from(Properties::NOTIFY.0)
        };
    }

    if properties.contains(Properties::INDICATE) {
        out.properties |= if secure.contains(Properties::INDICATE) {
            PROP_INDICATE_ENCRYPTED
        } else {
            u32::from(Properties::INDICATE.0)
        };
    }

    out
}
