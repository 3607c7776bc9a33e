/*!
 * Kernel Configuration
 *
 * Pool sizes and policy knobs fixed when a kernel instance is built.
 */

use crate::core::limits::{
    DEFAULT_MAXIMUM_BARRIERS, DEFAULT_MAXIMUM_POSIX_BARRIERS, DEFAULT_MAXIMUM_POSIX_SPINLOCKS,
    LOCAL_NODE,
};
use crate::core::sync::SpinConfig;
use crate::core::types::{Node, ObjectIndex};
use serde::{Deserialize, Serialize};

/// Configuration of one kernel instance
///
/// Missing fields take their defaults when deserialized, so a partial JSON
/// document such as `{"maximum_posix_spinlocks": 1}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Node number encoded into every identifier
    pub node: Node,
    /// Capacity of the POSIX barrier pool
    pub maximum_posix_barriers: ObjectIndex,
    /// Capacity of the POSIX spinlock pool
    pub maximum_posix_spinlocks: ObjectIndex,
    /// Capacity of the classic barrier pool
    pub maximum_barriers: ObjectIndex,
    /// Permit spinlock lock/try_lock/unlock from interrupt context
    pub isr_spinlocks: bool,
    /// Busy-wait tuning for spinlock acquisition
    pub spin: SpinConfig,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            node: LOCAL_NODE,
            maximum_posix_barriers: DEFAULT_MAXIMUM_POSIX_BARRIERS,
            maximum_posix_spinlocks: DEFAULT_MAXIMUM_POSIX_SPINLOCKS,
            maximum_barriers: DEFAULT_MAXIMUM_BARRIERS,
            isr_spinlocks: false,
            spin: SpinConfig::default(),
        }
    }
}

impl KernelConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_posix_barriers(mut self, maximum: ObjectIndex) -> Self {
        self.maximum_posix_barriers = maximum;
        self
    }

    pub fn with_posix_spinlocks(mut self, maximum: ObjectIndex) -> Self {
        self.maximum_posix_spinlocks = maximum;
        self
    }

    pub fn with_barriers(mut self, maximum: ObjectIndex) -> Self {
        self.maximum_barriers = maximum;
        self
    }

    pub fn with_isr_spinlocks(mut self, allowed: bool) -> Self {
        self.isr_spinlocks = allowed;
        self
    }

    pub fn with_spin(mut self, spin: SpinConfig) -> Self {
        self.spin = spin;
        self
    }
}
