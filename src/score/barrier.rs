/*!
 * Barrier
 *
 * Rendezvous object: threads arriving at the barrier block until the party
 * count is reached, then all of them are released together and the count
 * starts over.
 *
 * # Release Disciplines
 *
 * - **Automatic**: the arrival that brings the count to `maximum_count`
 *   releases every queued waiter and returns at once without blocking; it is
 *   the *serial* thread of that round.
 * - **Manual**: arrivals always block; waiters are released by an explicit
 *   `release` call.
 *
 * Counting, enqueueing and releasing all happen inside one dispatch-disable
 * scope, so no arrival can interleave with a release in progress and the
 * count never passes `maximum_count`.
 */

use crate::core::errors::{Result, SyncError};
use crate::core::guard::{in_interrupt, DispatchGuard, Dispatcher};
use crate::core::sync::{Suspension, ThreadQueue, WaitOrder};
use crate::core::types::{Count, Node, ObjectIndex};
use crate::objects::{ObjectClass, ObjectId, ObjectInformation, ObjectName};
use crate::thread::{self, ThreadControl, WakeReason};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// How queued waiters get released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseDiscipline {
    #[default]
    Automatic,
    Manual,
}

/// Creation attributes of a barrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrierAttributes {
    pub discipline: ReleaseDiscipline,
    /// Party count; ignored under manual release
    pub maximum_count: Count,
}

impl BarrierAttributes {
    pub const fn automatic(maximum_count: Count) -> Self {
        Self {
            discipline: ReleaseDiscipline::Automatic,
            maximum_count,
        }
    }

    pub const fn manual() -> Self {
        Self {
            discipline: ReleaseDiscipline::Manual,
            maximum_count: 0,
        }
    }
}

/// How a successful wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarrierWait {
    /// Released by another context
    Released,
    /// This arrival completed the party and released the others
    Serial,
}

impl BarrierWait {
    #[inline]
    pub fn is_serial(&self) -> bool {
        matches!(self, BarrierWait::Serial)
    }
}

/// Result of one arrival at a barrier
#[derive(Debug)]
pub enum Arrival {
    /// The party is complete; this many queued waiters were released
    Released(usize),
    /// The caller was queued and must suspend
    Blocked(Suspension),
}

/// Barrier control block
#[derive(Debug)]
pub struct CoreBarrier {
    attributes: BarrierAttributes,
    waiting: Count,
    queue: ThreadQueue,
}

impl CoreBarrier {
    pub fn new(attributes: BarrierAttributes) -> Self {
        Self {
            attributes,
            waiting: 0,
            queue: ThreadQueue::new(WaitOrder::Fifo),
        }
    }

    #[inline]
    pub fn attributes(&self) -> BarrierAttributes {
        self.attributes
    }

    /// Arrivals counted in the current round
    #[inline]
    pub fn waiting(&self) -> Count {
        self.waiting
    }

    /// Threads blocked right now
    #[inline]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Count one arrival of `thread`
    pub fn arrive(&mut self, thread: Arc<ThreadControl>) -> Arrival {
        self.waiting += 1;

        if self.attributes.discipline == ReleaseDiscipline::Automatic
            && self.waiting == self.attributes.maximum_count
        {
            return Arrival::Released(self.release());
        }

        Arrival::Blocked(self.queue.enqueue(thread))
    }

    /// Release every waiter and start a new round
    pub fn release(&mut self) -> usize {
        self.waiting = 0;
        self.queue.dequeue_all()
    }

    /// Wake every waiter with `reason` and start a new round
    pub fn flush(&mut self, reason: WakeReason) -> usize {
        self.waiting = 0;
        self.queue.flush(reason)
    }
}

/// A barrier object class: its pool plus the operations on its members
#[derive(Debug)]
pub struct BarrierPool {
    dispatcher: Arc<Dispatcher>,
    objects: ObjectInformation<CoreBarrier>,
}

impl BarrierPool {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        class: ObjectClass,
        node: Node,
        maximum: ObjectIndex,
    ) -> Self {
        Self {
            dispatcher,
            objects: ObjectInformation::new(class, node, maximum),
        }
    }

    #[inline]
    pub fn class(&self) -> ObjectClass {
        self.objects.class()
    }

    /// Barriers currently open
    pub fn active_count(&self) -> usize {
        let _dispatch = DispatchGuard::new(&self.dispatcher);
        self.objects.lock().active_count()
    }

    /// Configured pool capacity
    pub fn maximum(&self) -> ObjectIndex {
        let _dispatch = DispatchGuard::new(&self.dispatcher);
        self.objects.lock().maximum()
    }

    /// Allocate and open a barrier
    pub fn create(&self, name: ObjectName, attributes: BarrierAttributes) -> Result<ObjectId> {
        if attributes.discipline == ReleaseDiscipline::Automatic && attributes.maximum_count == 0
        {
            warn!(class = %self.class(), "barrier with zero party count rejected");
            return Err(SyncError::InvalidCount);
        }

        let _dispatch = DispatchGuard::new(&self.dispatcher);
        let created = self
            .objects
            .lock()
            .allocate_with(name, |_| CoreBarrier::new(attributes));

        match created {
            Ok(id) => {
                debug!(class = %self.class(), %id, ?attributes, "barrier created");
                Ok(id)
            }
            Err(e) => {
                warn!(class = %self.class(), error = %e, "barrier pool exhausted");
                Err(e)
            }
        }
    }

    /// Arrive at the barrier and block until the round completes
    #[instrument(level = "trace", skip(self), fields(class = %self.class()))]
    pub fn wait(&self, id: ObjectId) -> Result<BarrierWait> {
        if in_interrupt() {
            warn!(%id, "barrier wait from interrupt context rejected");
            return Err(SyncError::CalledFromInterrupt);
        }

        let _dispatch = DispatchGuard::new(&self.dispatcher);
        let suspension = {
            let mut table = self.objects.lock();
            let barrier = table.lookup_mut(id)?;
            match barrier.arrive(thread::current()) {
                Arrival::Released(released) => {
                    debug!(%id, released, "barrier round complete");
                    return Ok(BarrierWait::Serial);
                }
                Arrival::Blocked(suspension) => suspension,
            }
        };

        match suspension.wait(&self.dispatcher) {
            WakeReason::Satisfied => Ok(BarrierWait::Released),
            WakeReason::ObjectDeleted => Err(SyncError::ObjectDeleted),
        }
    }

    /// Release all current waiters; returns how many were released
    pub fn release(&self, id: ObjectId) -> Result<usize> {
        let _dispatch = DispatchGuard::new(&self.dispatcher);
        let released = self.objects.lock().lookup_mut(id)?.release();
        debug!(class = %self.class(), %id, released, "barrier released");
        Ok(released)
    }

    /// Free a barrier that nobody waits on
    pub fn destroy(&self, id: ObjectId) -> Result<()> {
        let _dispatch = DispatchGuard::new(&self.dispatcher);
        let mut table = self.objects.lock();

        let waiting = table.lookup(id)?.waiting();
        if waiting > 0 {
            warn!(class = %self.class(), %id, waiting, "barrier destroy with waiters rejected");
            return Err(SyncError::Busy);
        }

        table.close(id)?;
        debug!(class = %self.class(), %id, "barrier destroyed");
        Ok(())
    }

    /// Free a barrier, waking every waiter with [`SyncError::ObjectDeleted`]
    ///
    /// Returns how many waiters were woken.
    pub fn delete(&self, id: ObjectId) -> Result<usize> {
        let _dispatch = DispatchGuard::new(&self.dispatcher);
        let mut table = self.objects.lock();

        let woken = table.lookup_mut(id)?.flush(WakeReason::ObjectDeleted);
        table.close(id)?;
        debug!(class = %self.class(), %id, woken, "barrier deleted");
        Ok(woken)
    }

    /// Whether `id` names an open barrier of this pool
    pub fn is_open(&self, id: ObjectId) -> bool {
        let _dispatch = DispatchGuard::new(&self.dispatcher);
        self.objects.lock().lookup(id).is_ok()
    }

    /// Arrivals counted in the barrier's current round
    pub fn waiting(&self, id: ObjectId) -> Result<Count> {
        let _dispatch = DispatchGuard::new(&self.dispatcher);
        Ok(self.objects.lock().lookup(id)?.waiting())
    }

    /// Look up a barrier by name
    pub fn ident(&self, name: ObjectName) -> Result<ObjectId> {
        let _dispatch = DispatchGuard::new(&self.dispatcher);
        self.objects.lock().ident(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::guard::InterruptScope;
    use std::thread as std_thread;
    use std::time::Duration;

    fn pool(maximum: ObjectIndex) -> Arc<BarrierPool> {
        Arc::new(BarrierPool::new(
            Arc::new(Dispatcher::new()),
            ObjectClass::PosixBarrier,
            1,
            maximum,
        ))
    }

    fn wait_for_waiting(pool: &BarrierPool, id: ObjectId, count: Count) {
        while pool.waiting(id).unwrap() < count {
            std_thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_core_barrier_single_party_never_blocks() {
        let mut barrier = CoreBarrier::new(BarrierAttributes::automatic(1));
        match barrier.arrive(thread::current()) {
            Arrival::Released(n) => assert_eq!(n, 0),
            Arrival::Blocked(_) => panic!("single-party barrier blocked"),
        }
        assert_eq!(barrier.waiting(), 0);
    }

    #[test]
    fn test_zero_count_rejected() {
        let pool = pool(1);
        assert_eq!(
            pool.create(ObjectName::NONE, BarrierAttributes::automatic(0)),
            Err(SyncError::InvalidCount)
        );
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_round_releases_everyone() {
        let pool = pool(1);
        let id = pool
            .create(ObjectName::NONE, BarrierAttributes::automatic(3))
            .unwrap();

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let pool = pool.clone();
                std_thread::spawn(move || pool.wait(id))
            })
            .collect();
        wait_for_waiting(&pool, id, 2);

        assert_eq!(pool.wait(id), Ok(BarrierWait::Serial));
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(BarrierWait::Released));
        }
        assert_eq!(pool.waiting(id), Ok(0));
        assert_eq!(pool.destroy(id), Ok(()));
    }

    #[test]
    fn test_destroy_busy_while_waiting() {
        let pool = pool(1);
        let id = pool
            .create(ObjectName::NONE, BarrierAttributes::automatic(2))
            .unwrap();

        let waiter = {
            let pool = pool.clone();
            std_thread::spawn(move || pool.wait(id))
        };
        wait_for_waiting(&pool, id, 1);

        assert_eq!(pool.destroy(id), Err(SyncError::Busy));
        assert_eq!(pool.wait(id), Ok(BarrierWait::Serial));
        assert_eq!(waiter.join().unwrap(), Ok(BarrierWait::Released));
        assert!(pool.is_open(id));
        assert_eq!(pool.destroy(id), Ok(()));
        assert!(!pool.is_open(id));
        assert_eq!(pool.wait(id), Err(SyncError::InvalidId));
    }

    #[test]
    fn test_manual_release_and_delete() {
        let pool = pool(1);
        let id = pool
            .create(ObjectName::from(b"MANU"), BarrierAttributes::manual())
            .unwrap();
        assert_eq!(pool.ident(ObjectName::from(b"MANU")), Ok(id));

        let spawn = |pool: &Arc<BarrierPool>| {
            let pool = pool.clone();
            std_thread::spawn(move || pool.wait(id))
        };

        let first: Vec<_> = (0..2).map(|_| spawn(&pool)).collect();
        wait_for_waiting(&pool, id, 2);
        assert_eq!(pool.release(id), Ok(2));
        for handle in first {
            assert_eq!(handle.join().unwrap(), Ok(BarrierWait::Released));
        }

        let second = spawn(&pool);
        wait_for_waiting(&pool, id, 1);
        assert_eq!(pool.delete(id), Ok(1));
        assert_eq!(second.join().unwrap(), Err(SyncError::ObjectDeleted));
        assert_eq!(pool.ident(ObjectName::from(b"MANU")), Err(SyncError::InvalidName));
    }

    #[test]
    fn test_wait_from_interrupt_rejected() {
        let pool = pool(1);
        let id = pool
            .create(ObjectName::NONE, BarrierAttributes::automatic(2))
            .unwrap();
        let _isr = InterruptScope::enter();
        assert_eq!(pool.wait(id), Err(SyncError::CalledFromInterrupt));
        assert_eq!(pool.waiting(id), Ok(0));
    }
}
