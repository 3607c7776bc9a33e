/*!
 * Object Names
 *
 * Four ASCII bytes packed into a u32, most significant byte first.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectName(pub u32);

impl ObjectName {
    /// No name; never valid for create or ident
    pub const NONE: ObjectName = ObjectName(0);

    pub const fn from_chars(c1: u8, c2: u8, c3: u8, c4: u8) -> Self {
        Self(u32::from_be_bytes([c1, c2, c3, c4]))
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl From<&[u8; 4]> for ObjectName {
    fn from(bytes: &[u8; 4]) -> Self {
        Self(u32::from_be_bytes(*bytes))
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes() {
            let c = if byte.is_ascii_graphic() { byte as char } else { '?' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
