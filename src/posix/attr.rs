/*!
 * Barrier Attributes
 */

use super::{is_valid_pshared, PTHREAD_PROCESS_PRIVATE};
use nix::errno::Errno;
use serde::{Deserialize, Serialize};

/// `pthread_barrierattr_t`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PthreadBarrierAttr {
    pub is_initialized: bool,
    pub process_shared: i32,
}

impl PthreadBarrierAttr {
    /// An initialized, process-private attribute object
    pub const fn new() -> Self {
        Self {
            is_initialized: true,
            process_shared: PTHREAD_PROCESS_PRIVATE,
        }
    }
}

pub fn barrierattr_init(attr: Option<&mut PthreadBarrierAttr>) -> i32 {
    match attr {
        Some(attr) => {
            *attr = PthreadBarrierAttr::new();
            0
        }
        None => Errno::EINVAL as i32,
    }
}

pub fn barrierattr_destroy(attr: Option<&mut PthreadBarrierAttr>) -> i32 {
    match attr {
        Some(attr) if attr.is_initialized => {
            attr.is_initialized = false;
            0
        }
        _ => Errno::EINVAL as i32,
    }
}

/// Accepts both sharing modes; a shared barrier is refused later, at init
pub fn barrierattr_setpshared(attr: Option<&mut PthreadBarrierAttr>, pshared: i32) -> i32 {
    match attr {
        Some(attr) if attr.is_initialized && is_valid_pshared(pshared) => {
            attr.process_shared = pshared;
            0
        }
        _ => Errno::EINVAL as i32,
    }
}

pub fn barrierattr_getpshared(attr: Option<&PthreadBarrierAttr>, pshared: Option<&mut i32>) -> i32 {
    match (attr, pshared) {
        (Some(attr), Some(pshared)) if attr.is_initialized => {
            *pshared = attr.process_shared;
            0
        }
        _ => Errno::EINVAL as i32,
    }
}
