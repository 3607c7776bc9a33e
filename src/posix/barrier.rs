/*!
 * POSIX Barriers
 */

use super::{
    errno_of, Posix, PthreadBarrier, PthreadBarrierAttr, PTHREAD_BARRIER_SERIAL_THREAD,
    PTHREAD_PROCESS_PRIVATE,
};
use crate::core::errors::SyncError;
use crate::core::guard::DispatchGuard;
use crate::core::types::Count;
use crate::objects::ObjectName;
use crate::score::{BarrierAttributes, BarrierWait};
use tracing::warn;

impl Posix<'_> {
    /// `pthread_barrier_init`
    ///
    /// With no attribute object the defaults (initialized, process-private)
    /// apply. A handle that still names an open barrier is not
    /// re-initialized: the call fails with `EAGAIN`.
    pub fn barrier_init(
        &self,
        barrier: Option<&mut PthreadBarrier>,
        attr: Option<&PthreadBarrierAttr>,
        count: Count,
    ) -> i32 {
        let Some(barrier) = barrier else {
            return errno_of(Err(SyncError::InvalidId));
        };
        if count == 0 {
            return errno_of(Err(SyncError::InvalidCount));
        }

        let attr = attr.copied().unwrap_or_else(PthreadBarrierAttr::new);
        if !attr.is_initialized {
            return errno_of(Err(SyncError::InvalidAttribute));
        }
        if attr.process_shared != PTHREAD_PROCESS_PRIVATE {
            warn!(pshared = attr.process_shared, "process-shared barrier rejected");
            return errno_of(Err(SyncError::InvalidAttribute));
        }

        let _dispatch = DispatchGuard::new(self.kernel.dispatcher());
        if !barrier.is_none() && self.kernel.barriers().is_open(*barrier) {
            warn!(id = %barrier, "barrier handle still in use");
            return errno_of(Err(SyncError::ResourceExhausted));
        }

        let created = self
            .kernel
            .barriers()
            .create(ObjectName::NONE, BarrierAttributes::automatic(count));
        errno_of(created.map(|id| *barrier = id))
    }

    /// `pthread_barrier_wait`
    ///
    /// Returns [`PTHREAD_BARRIER_SERIAL_THREAD`] to the waiter that completed
    /// the round and 0 to the others.
    pub fn barrier_wait(&self, barrier: Option<&PthreadBarrier>) -> i32 {
        let Some(&id) = barrier else {
            return errno_of(Err(SyncError::InvalidId));
        };
        match self.kernel.barriers().wait(id) {
            Ok(BarrierWait::Serial) => PTHREAD_BARRIER_SERIAL_THREAD,
            Ok(BarrierWait::Released) => 0,
            Err(e) => errno_of(Err(e)),
        }
    }

    /// `pthread_barrier_destroy`
    pub fn barrier_destroy(&self, barrier: Option<&PthreadBarrier>) -> i32 {
        let Some(&id) = barrier else {
            return errno_of(Err(SyncError::InvalidId));
        };
        errno_of(self.kernel.barriers().destroy(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Kernel, KernelConfig};
    use crate::posix::PTHREAD_PROCESS_SHARED;
    use nix::errno::Errno;

    const EINVAL: i32 = Errno::EINVAL as i32;
    const EAGAIN: i32 = Errno::EAGAIN as i32;

    #[test]
    fn test_init_argument_checks() {
        let kernel = Kernel::new(KernelConfig::default().with_posix_barriers(1));
        let posix = kernel.posix();
        let mut barrier = PthreadBarrier::NONE;
        let mut attr = PthreadBarrierAttr::default();

        assert_eq!(posix.barrier_init(None, None, 2), EINVAL);
        assert_eq!(posix.barrier_init(Some(&mut barrier), None, 0), EINVAL);
        assert_eq!(posix.barrier_init(Some(&mut barrier), Some(&attr), 2), EINVAL);

        attr = PthreadBarrierAttr::new();
        attr.process_shared = PTHREAD_PROCESS_SHARED;
        assert_eq!(posix.barrier_init(Some(&mut barrier), Some(&attr), 2), EINVAL);
        attr.process_shared = 0x1234;
        assert_eq!(posix.barrier_init(Some(&mut barrier), Some(&attr), 2), EINVAL);
        assert!(barrier.is_none());

        assert_eq!(posix.barrier_init(Some(&mut barrier), None, 2), 0);
        assert!(!barrier.is_none());

        let mut second = PthreadBarrier::NONE;
        assert_eq!(posix.barrier_init(Some(&mut second), None, 2), EAGAIN);
        assert!(second.is_none());
    }

    #[test]
    fn test_reinit_of_open_handle_refused() {
        let kernel = Kernel::default();
        let posix = kernel.posix();
        let mut barrier = PthreadBarrier::NONE;

        assert_eq!(posix.barrier_init(Some(&mut barrier), None, 2), 0);
        let first = barrier;
        assert_eq!(posix.barrier_init(Some(&mut barrier), None, 3), EAGAIN);
        assert_eq!(barrier, first);
        assert_eq!(kernel.barriers().active_count(), 1);

        assert_eq!(posix.barrier_destroy(Some(&barrier)), 0);
        assert_eq!(posix.barrier_init(Some(&mut barrier), None, 3), 0);
        assert_eq!(kernel.barriers().active_count(), 1);
    }

    #[test]
    fn test_single_party_is_always_serial() {
        let kernel = Kernel::default();
        let posix = kernel.posix();
        let mut barrier = PthreadBarrier::NONE;

        assert_eq!(posix.barrier_init(Some(&mut barrier), None, 1), 0);
        assert_eq!(posix.barrier_wait(Some(&barrier)), PTHREAD_BARRIER_SERIAL_THREAD);
        assert_eq!(posix.barrier_wait(Some(&barrier)), PTHREAD_BARRIER_SERIAL_THREAD);
        assert_eq!(posix.barrier_destroy(Some(&barrier)), 0);
        assert_eq!(posix.barrier_wait(Some(&barrier)), EINVAL);
        assert_eq!(posix.barrier_destroy(Some(&barrier)), EINVAL);
    }

    #[test]
    fn test_missing_handle() {
        let kernel = Kernel::default();
        let posix = kernel.posix();
        assert_eq!(posix.barrier_wait(None), EINVAL);
        assert_eq!(posix.barrier_destroy(None), EINVAL);
        assert_eq!(posix.barrier_wait(Some(&PthreadBarrier::NONE)), EINVAL);
    }
}
