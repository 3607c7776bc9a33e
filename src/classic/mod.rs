/*!
 * Classic Barrier Directives
 *
 * The native API: barriers are created with a 32-bit name and a release
 * discipline, can be looked up by name, released by hand, and deleted while
 * threads wait on them. Deleting a barrier wakes its waiters with
 * [`SyncError::ObjectDeleted`] instead of refusing.
 */

use crate::core::errors::{Result, SyncError};
use crate::core::types::Count;
use crate::kernel::Kernel;
use crate::objects::{ObjectId, ObjectName};
use crate::score::{BarrierAttributes, ReleaseDiscipline};
use tracing::warn;

/// Classic view of a kernel
#[derive(Debug, Clone, Copy)]
pub struct Classic<'k> {
    kernel: &'k Kernel,
}

impl<'k> Classic<'k> {
    pub(crate) fn new(kernel: &'k Kernel) -> Self {
        Self { kernel }
    }

    /// Create a barrier
    ///
    /// Under automatic release `maximum_waiters` is the party count and must
    /// be non-zero; under manual release it is ignored.
    pub fn barrier_create(
        &self,
        name: ObjectName,
        discipline: ReleaseDiscipline,
        maximum_waiters: Count,
    ) -> Result<ObjectId> {
        if !name.is_valid() {
            warn!("classic barrier without a name rejected");
            return Err(SyncError::InvalidName);
        }

        let attributes = match discipline {
            ReleaseDiscipline::Automatic => BarrierAttributes::automatic(maximum_waiters),
            ReleaseDiscipline::Manual => BarrierAttributes {
                discipline,
                maximum_count: maximum_waiters,
            },
        };
        self.kernel.classic_barriers().create(name, attributes)
    }

    /// Find a barrier by name
    pub fn barrier_ident(&self, name: ObjectName) -> Result<ObjectId> {
        self.kernel.classic_barriers().ident(name)
    }

    /// Block at the barrier until its round completes or it is released
    pub fn barrier_wait(&self, id: ObjectId) -> Result<()> {
        self.kernel.classic_barriers().wait(id).map(|_| ())
    }

    /// Release every waiter; returns how many were released
    pub fn barrier_release(&self, id: ObjectId) -> Result<u32> {
        let released = self.kernel.classic_barriers().release(id)?;
        Ok(released as u32)
    }

    /// Delete a barrier, waking its waiters with [`SyncError::ObjectDeleted`]
    pub fn barrier_delete(&self, id: ObjectId) -> Result<()> {
        self.kernel.classic_barriers().delete(id).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::KernelConfig;
    use pretty_assertions::assert_eq;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_create_validation() {
        let kernel = Kernel::new(KernelConfig::default().with_barriers(1));
        let classic = kernel.classic();

        assert_eq!(
            classic.barrier_create(ObjectName::NONE, ReleaseDiscipline::Automatic, 2),
            Err(SyncError::InvalidName)
        );
        assert_eq!(
            classic.barrier_create(ObjectName::from(b"BAR0"), ReleaseDiscipline::Automatic, 0),
            Err(SyncError::InvalidCount)
        );

        let id = classic
            .barrier_create(ObjectName::from(b"BAR0"), ReleaseDiscipline::Manual, 0)
            .unwrap();
        assert_eq!(
            classic.barrier_create(ObjectName::from(b"BAR1"), ReleaseDiscipline::Manual, 0),
            Err(SyncError::ResourceExhausted)
        );
        assert_eq!(classic.barrier_ident(ObjectName::from(b"BAR0")), Ok(id));
        assert_eq!(classic.barrier_ident(ObjectName::from(b"BAR1")), Err(SyncError::InvalidName));
    }

    #[test]
    fn test_release_with_no_waiters() {
        let kernel = Kernel::default();
        let classic = kernel.classic();
        let id = classic
            .barrier_create(ObjectName::from(b"IDLE"), ReleaseDiscipline::Automatic, 3)
            .unwrap();

        assert_eq!(classic.barrier_release(id), Ok(0));
        assert_eq!(classic.barrier_delete(id), Ok(()));
        assert_eq!(classic.barrier_release(id), Err(SyncError::InvalidId));
        assert_eq!(classic.barrier_delete(id), Err(SyncError::InvalidId));
    }

    #[test]
    fn test_automatic_round() {
        let kernel = Kernel::default();
        let id = kernel
            .classic()
            .barrier_create(ObjectName::from(b"AUTO"), ReleaseDiscipline::Automatic, 2)
            .unwrap();

        thread::scope(|s| {
            let waiter = s.spawn(|| kernel.classic().barrier_wait(id));
            while kernel.classic_barriers().waiting(id) != Ok(1) {
                thread::sleep(Duration::from_millis(1));
            }
            assert_eq!(kernel.classic().barrier_wait(id), Ok(()));
            assert_eq!(waiter.join().unwrap(), Ok(()));
        });
    }
}
