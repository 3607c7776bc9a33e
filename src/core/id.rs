/*!
 * ID Generation System
 * Type-safe thread identities and the counter that hands them out
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

// ============================================================================
// Type-Safe ID Wrappers
// ============================================================================

/// Kernel thread ID (never zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub u32);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Atomic Counter Generator
// ============================================================================

/// Lock-free monotonic counter for identities that are never recycled
///
/// # Performance
/// - Cache-line aligned to prevent false sharing
/// - Usable from a `static` (const constructor)
#[repr(C, align(64))]
pub struct AtomicGenerator {
    counter: AtomicU32,
}

impl AtomicGenerator {
    /// Create new generator starting at given value
    #[inline]
    pub const fn new(start: u32) -> Self {
        Self {
            counter: AtomicU32::new(start),
        }
    }

    /// Generate next ID
    #[inline]
    pub fn next(&self) -> u32 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Get current counter value (for debugging)
    #[inline]
    pub fn current(&self) -> u32 {
        self.counter.load(Ordering::Relaxed)
    }
}

/// Process-wide source of thread IDs (starts at 1 so zero stays invalid)
pub(crate) static THREAD_IDS: AtomicGenerator = AtomicGenerator::new(1);

// ============================================================================
// Tests
// ============================================================================
