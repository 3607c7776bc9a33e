/*!
 * System Limits and Constants
 *
 * Centralized location for pool sizes, identifier layout and spin tuning.
 */

// =============================================================================
// OBJECT IDENTIFIERS
// =============================================================================

/// Bit position of the pool index field
pub const OBJECT_INDEX_START_BIT: u32 = 0;

/// Bit position of the node field
pub const OBJECT_NODE_START_BIT: u32 = 16;

/// Bit position of the API field
pub const OBJECT_API_START_BIT: u32 = 24;

/// Bit position of the class field
pub const OBJECT_CLASS_START_BIT: u32 = 27;

/// Index field mask (16 bits, before shifting)
pub const OBJECT_INDEX_MASK: u32 = 0xFFFF;

/// Node field mask (8 bits)
pub const OBJECT_NODE_MASK: u32 = 0xFF;

/// API field mask (3 bits)
pub const OBJECT_API_MASK: u32 = 0x7;

/// Class field mask (5 bits)
pub const OBJECT_CLASS_MASK: u32 = 0x1F;

/// Largest pool a single class may configure (index 0 is reserved)
pub const MAXIMUM_OBJECTS_PER_CLASS: u16 = u16::MAX;

/// Node number of a single-node system
pub const LOCAL_NODE: u8 = 1;

// =============================================================================
// DEFAULT POOL SIZES
// =============================================================================

/// Default number of POSIX barriers
pub const DEFAULT_MAXIMUM_POSIX_BARRIERS: u16 = 10;

/// Default number of POSIX spinlocks
pub const DEFAULT_MAXIMUM_POSIX_SPINLOCKS: u16 = 10;

/// Default number of classic barriers
pub const DEFAULT_MAXIMUM_BARRIERS: u16 = 10;

// =============================================================================
// THREADS
// =============================================================================

/// Priority assigned to a thread on first contact with the kernel
/// Lower values are more urgent
pub const DEFAULT_THREAD_PRIORITY: u8 = 100;

// =============================================================================
// SPINNING
// =============================================================================

/// Polls spent in a tight `spin_loop()` before yielding
/// [PERF] Covers holders that release within a few hundred nanoseconds
pub const DEFAULT_SPIN_PHASE: u32 = 64;

/// Polls spent yielding before falling back to short sleeps
pub const DEFAULT_YIELD_PHASE: u32 = 256;

/// Upper bound on the sleep between polls in the last phase (microseconds)
pub const MAX_SPIN_SLEEP_MICROS: u64 = 50;
