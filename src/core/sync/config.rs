/*!
 * Spin Configuration
 *
 * Tuning for the busy-wait loop of spinlock acquisition
 */

use crate::core::limits::{DEFAULT_SPIN_PHASE, DEFAULT_YIELD_PHASE, MAX_SPIN_SLEEP_MICROS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Busy-wait tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    /// Polls with only a `spin_loop()` hint between them
    pub spin_phase: u32,
    /// Further polls that yield the host CPU between them
    pub yield_phase: u32,
    /// Cap on the sleep between polls once both phases are exhausted
    #[serde(with = "micros")]
    pub max_sleep: Duration,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            spin_phase: DEFAULT_SPIN_PHASE,
            yield_phase: DEFAULT_YIELD_PHASE,
            max_sleep: Duration::from_micros(MAX_SPIN_SLEEP_MICROS),
        }
    }
}

impl SpinConfig {
    /// Configuration that never sleeps (pure spin, then yield forever)
    pub const fn low_latency() -> Self {
        Self {
            spin_phase: 1024,
            yield_phase: u32::MAX,
            max_sleep: Duration::ZERO,
        }
    }
}

mod micros {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_micros() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_micros)
    }
}
