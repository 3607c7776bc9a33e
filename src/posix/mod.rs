/*!
 * POSIX Threads Surface
 *
 * `pthread_barrier*` and `pthread_spin*` entry points over the kernel's
 * POSIX object pools. Every call returns an errno value: 0 on success, a
 * positive `E*` code on failure, and [`PTHREAD_BARRIER_SERIAL_THREAD`] for
 * the one waiter of each barrier round that completed it.
 *
 * Handles are written only when initialization succeeds. A zeroed handle
 * never names an object and fails with `EINVAL`; a handle that still names
 * an open object must be destroyed before it is initialized again.
 */

mod attr;
mod barrier;
mod spinlock;

pub use attr::{
    barrierattr_destroy, barrierattr_getpshared, barrierattr_init, barrierattr_setpshared,
    PthreadBarrierAttr,
};

use crate::core::errors::Result;
use crate::kernel::Kernel;
use crate::objects::ObjectId;

/// Objects are private to the creating process
pub const PTHREAD_PROCESS_PRIVATE: i32 = 0;

/// Objects may be shared between processes; always rejected here
pub const PTHREAD_PROCESS_SHARED: i32 = 1;

/// Returned to exactly one waiter per completed barrier round
pub const PTHREAD_BARRIER_SERIAL_THREAD: i32 = -1;

/// Barrier handle
pub type PthreadBarrier = ObjectId;

/// Spinlock handle
pub type PthreadSpinlock = ObjectId;

/// POSIX view of a kernel
#[derive(Debug, Clone, Copy)]
pub struct Posix<'k> {
    kernel: &'k Kernel,
}

impl<'k> Posix<'k> {
    pub(crate) fn new(kernel: &'k Kernel) -> Self {
        Self { kernel }
    }

    #[inline]
    pub fn kernel(&self) -> &'k Kernel {
        self.kernel
    }
}

pub(crate) fn errno_of(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => e.errno() as i32,
    }
}

pub(crate) fn is_valid_pshared(pshared: i32) -> bool {
    pshared == PTHREAD_PROCESS_PRIVATE || pshared == PTHREAD_PROCESS_SHARED
}
