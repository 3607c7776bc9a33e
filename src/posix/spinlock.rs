/*!
 * POSIX Spinlocks
 */

use super::{errno_of, is_valid_pshared, Posix, PthreadSpinlock, PTHREAD_PROCESS_PRIVATE};
use crate::core::errors::SyncError;
use crate::core::guard::DispatchGuard;
use crate::objects::ObjectName;
use tracing::warn;

impl Posix<'_> {
    /// `pthread_spin_init`
    ///
    /// A handle that still names an open spinlock is not re-initialized:
    /// the call fails with `EAGAIN` and the handle keeps its object.
    pub fn spin_init(&self, lock: Option<&mut PthreadSpinlock>, pshared: i32) -> i32 {
        let Some(lock) = lock else {
            return errno_of(Err(SyncError::InvalidId));
        };
        if !is_valid_pshared(pshared) {
            return errno_of(Err(SyncError::InvalidAttribute));
        }
        if pshared != PTHREAD_PROCESS_PRIVATE {
            warn!(pshared, "process-shared spinlock rejected");
            return errno_of(Err(SyncError::InvalidAttribute));
        }

        let _dispatch = DispatchGuard::new(self.kernel.dispatcher());
        if !lock.is_none() && self.kernel.spinlocks().is_open(*lock) {
            warn!(id = %lock, "spinlock handle still in use");
            return errno_of(Err(SyncError::ResourceExhausted));
        }

        let created = self.kernel.spinlocks().create(ObjectName::NONE);
        errno_of(created.map(|id| *lock = id))
    }

    /// `pthread_spin_lock`
    pub fn spin_lock(&self, lock: Option<&PthreadSpinlock>) -> i32 {
        match lock {
            Some(&id) => errno_of(self.kernel.spinlocks().lock(id)),
            None => errno_of(Err(SyncError::InvalidId)),
        }
    }

    /// `pthread_spin_trylock`
    pub fn spin_trylock(&self, lock: Option<&PthreadSpinlock>) -> i32 {
        match lock {
            Some(&id) => errno_of(self.kernel.spinlocks().try_lock(id)),
            None => errno_of(Err(SyncError::InvalidId)),
        }
    }

    /// `pthread_spin_unlock`
    pub fn spin_unlock(&self, lock: Option<&PthreadSpinlock>) -> i32 {
        match lock {
            Some(&id) => errno_of(self.kernel.spinlocks().unlock(id)),
            None => errno_of(Err(SyncError::InvalidId)),
        }
    }

    /// `pthread_spin_destroy`
    pub fn spin_destroy(&self, lock: Option<&PthreadSpinlock>) -> i32 {
        match lock {
            Some(&id) => errno_of(self.kernel.spinlocks().destroy(id)),
            None => errno_of(Err(SyncError::InvalidId)),
        }
    }
}
