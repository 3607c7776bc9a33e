/*!
 * RTOS Synchronization Core
 *
 * Object registry, critical sections, wait queues, barriers and spinlocks,
 * exposed through POSIX-style and classic entry points.
 */

pub mod classic;
pub mod core;
pub mod kernel;
pub mod objects;
pub mod posix;
pub mod score;
pub mod thread;

// Re-exports
pub use crate::core::errors::{ErrorKind, Result, SyncError};
pub use crate::core::tracer::init_tracing;
pub use classic::Classic;
pub use kernel::{Kernel, KernelConfig, PoolUsage};
pub use objects::{ObjectClass, ObjectId, ObjectName};
pub use posix::{
    Posix, PthreadBarrier, PthreadBarrierAttr, PthreadSpinlock, PTHREAD_BARRIER_SERIAL_THREAD,
    PTHREAD_PROCESS_PRIVATE, PTHREAD_PROCESS_SHARED,
};
pub use score::{BarrierAttributes, BarrierWait, ReleaseDiscipline};
