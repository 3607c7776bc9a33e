/*!
 * Object Identifiers
 *
 * 32-bit opaque handles naming one control block:
 *
 * ```text
 *  31      27 26  24 23      16 15                0
 * +----------+------+----------+-------------------+
 * |  class   | api  |   node   |       index       |
 * +----------+------+----------+-------------------+
 * ```
 *
 * Index 0 is never allocated, so the all-zero identifier never resolves.
 */

use crate::core::limits::{
    OBJECT_API_MASK, OBJECT_API_START_BIT, OBJECT_CLASS_MASK, OBJECT_CLASS_START_BIT,
    OBJECT_INDEX_MASK, OBJECT_INDEX_START_BIT, OBJECT_NODE_MASK, OBJECT_NODE_START_BIT,
};
use crate::core::types::{Node, ObjectIndex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API family an object belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ObjectApi {
    Internal = 1,
    Classic = 2,
    Posix = 3,
}

impl ObjectApi {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Internal),
            2 => Some(Self::Classic),
            3 => Some(Self::Posix),
            _ => None,
        }
    }
}

/// Object classes managed by this core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectClass {
    ClassicBarrier,
    PosixBarrier,
    PosixSpinlock,
}

impl ObjectClass {
    pub const fn api(self) -> ObjectApi {
        match self {
            Self::ClassicBarrier => ObjectApi::Classic,
            Self::PosixBarrier | Self::PosixSpinlock => ObjectApi::Posix,
        }
    }

    /// Class number within its API
    pub const fn number(self) -> u8 {
        match self {
            Self::ClassicBarrier => 10,
            Self::PosixBarrier => 10,
            Self::PosixSpinlock => 11,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::ClassicBarrier => "classic_barrier",
            Self::PosixBarrier => "posix_barrier",
            Self::PosixSpinlock => "posix_spinlock",
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque object identifier
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Identifier of nothing (a zeroed handle)
    pub const NONE: ObjectId = ObjectId(0);

    /// Pack raw fields; out-of-range bits are masked off
    #[inline]
    pub const fn from_parts(api: u8, class: u8, node: Node, index: ObjectIndex) -> Self {
        Self(
            ((class as u32 & OBJECT_CLASS_MASK) << OBJECT_CLASS_START_BIT)
                | ((api as u32 & OBJECT_API_MASK) << OBJECT_API_START_BIT)
                | ((node as u32 & OBJECT_NODE_MASK) << OBJECT_NODE_START_BIT)
                | ((index as u32 & OBJECT_INDEX_MASK) << OBJECT_INDEX_START_BIT),
        )
    }

    #[inline]
    pub const fn new(class: ObjectClass, node: Node, index: ObjectIndex) -> Self {
        Self::from_parts(class.api() as u8, class.number(), node, index)
    }

    #[inline]
    pub const fn api(self) -> u8 {
        ((self.0 >> OBJECT_API_START_BIT) & OBJECT_API_MASK) as u8
    }

    #[inline]
    pub const fn class(self) -> u8 {
        ((self.0 >> OBJECT_CLASS_START_BIT) & OBJECT_CLASS_MASK) as u8
    }

    #[inline]
    pub const fn node(self) -> Node {
        ((self.0 >> OBJECT_NODE_START_BIT) & OBJECT_NODE_MASK) as Node
    }

    #[inline]
    pub const fn index(self) -> ObjectIndex {
        ((self.0 >> OBJECT_INDEX_START_BIT) & OBJECT_INDEX_MASK) as ObjectIndex
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
