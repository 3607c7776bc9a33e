/*!
 * Spinlock
 *
 * Busy-wait mutual exclusion for very short critical sections.
 *
 * A contending `lock` never suspends: it polls the owner field inside a
 * brief interrupt-disable scope, leaves the scope, backs off, and polls again
 * until the owner is gone. Holders must therefore never block or run long
 * while holding the lock. There is no priority inheritance and no recursion:
 * a holder that locks again gets [`SyncError::Deadlock`], from `try_lock` as
 * well as from `lock`.
 */

use crate::core::errors::{Result, SyncError};
use crate::core::guard::{in_interrupt, DispatchGuard, Dispatcher, IsrGuard};
use crate::core::id::ThreadId;
use crate::core::sync::{SpinConfig, SpinWait};
use crate::core::types::{Node, ObjectIndex};
use crate::objects::{ObjectClass, ObjectId, ObjectInformation, ObjectName};
use crate::thread;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Spinlock control block
#[derive(Debug, Default)]
pub struct CoreSpinlock {
    holder: Option<ThreadId>,
    users: u32,
}

impl CoreSpinlock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn holder(&self) -> Option<ThreadId> {
        self.holder
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.holder.is_some()
    }

    /// Acquisitions currently outstanding: 1 while held, 0 otherwise
    #[inline]
    pub fn lock_nesting(&self) -> u32 {
        self.users
    }

    /// One acquisition attempt by `me`
    pub fn try_seize(&mut self, me: ThreadId) -> Result<()> {
        match self.holder {
            Some(holder) if holder == me => Err(SyncError::Deadlock),
            Some(_) => Err(SyncError::Busy),
            None => {
                self.holder = Some(me);
                self.users = 1;
                Ok(())
            }
        }
    }

    /// Release by `me`; releasing an unlocked lock is a no-op
    pub fn surrender(&mut self, me: ThreadId) -> Result<()> {
        match self.holder {
            None => Ok(()),
            Some(holder) if holder != me => Err(SyncError::NotOwner),
            Some(_) => {
                self.holder = None;
                self.users = 0;
                Ok(())
            }
        }
    }
}

/// A spinlock object class: its pool plus the operations on its members
#[derive(Debug)]
pub struct SpinlockPool {
    dispatcher: Arc<Dispatcher>,
    objects: ObjectInformation<CoreSpinlock>,
    spin: SpinConfig,
    isr_locking: bool,
}

impl SpinlockPool {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        class: ObjectClass,
        node: Node,
        maximum: ObjectIndex,
    ) -> Self {
        Self {
            dispatcher,
            objects: ObjectInformation::new(class, node, maximum),
            spin: SpinConfig::default(),
            isr_locking: false,
        }
    }

    /// Tune the busy-wait loop
    pub fn with_spin(mut self, spin: SpinConfig) -> Self {
        self.spin = spin;
        self
    }

    /// Allow lock operations from interrupt context
    pub fn with_isr_locking(mut self, allowed: bool) -> Self {
        self.isr_locking = allowed;
        self
    }

    #[inline]
    pub fn class(&self) -> ObjectClass {
        self.objects.class()
    }

    /// Spinlocks currently open
    pub fn active_count(&self) -> usize {
        let _dispatch = DispatchGuard::new(&self.dispatcher);
        self.objects.lock().active_count()
    }

    /// Configured pool capacity
    pub fn maximum(&self) -> ObjectIndex {
        let _dispatch = DispatchGuard::new(&self.dispatcher);
        self.objects.lock().maximum()
    }

    fn check_context(&self, id: ObjectId) -> Result<()> {
        if in_interrupt() && !self.isr_locking {
            warn!(class = %self.class(), %id, "spinlock use from interrupt context rejected");
            return Err(SyncError::CalledFromInterrupt);
        }
        Ok(())
    }

    /// Allocate and open an unlocked spinlock
    pub fn create(&self, name: ObjectName) -> Result<ObjectId> {
        let _dispatch = DispatchGuard::new(&self.dispatcher);
        let created = self
            .objects
            .lock()
            .allocate_with(name, |_| CoreSpinlock::new());

        match created {
            Ok(id) => {
                debug!(class = %self.class(), %id, "spinlock created");
                Ok(id)
            }
            Err(e) => {
                warn!(class = %self.class(), error = %e, "spinlock pool exhausted");
                Err(e)
            }
        }
    }

    fn poll(&self, id: ObjectId, me: ThreadId) -> Result<()> {
        let _isr = IsrGuard::new(&self.dispatcher);
        self.objects.lock().lookup_mut(id)?.try_seize(me)
    }

    /// Acquire, spinning while another context holds the lock
    ///
    /// Between polls the caller spins, then yields the host CPU, then sleeps
    /// for a few microseconds. The sleep phase exists only because kernel
    /// threads here are host threads that may share a CPU with the holder;
    /// [`SpinConfig::low_latency`] polls without ever sleeping.
    pub fn lock(&self, id: ObjectId) -> Result<()> {
        self.check_context(id)?;
        let me = thread::current_id();
        let mut backoff = SpinWait::new(self.spin);

        loop {
            match self.poll(id, me) {
                Ok(()) => {
                    trace!(%id, thread = %me, polls = backoff.polls(), "spinlock acquired");
                    return Ok(());
                }
                Err(SyncError::Busy) => backoff.snooze(),
                Err(e) => {
                    warn!(class = %self.class(), %id, thread = %me, error = %e, "spinlock lock failed");
                    return Err(e);
                }
            }
        }
    }

    /// Acquire only if nobody holds the lock
    pub fn try_lock(&self, id: ObjectId) -> Result<()> {
        self.check_context(id)?;
        let me = thread::current_id();
        self.poll(id, me).map_err(|e| {
            if e != SyncError::Busy {
                warn!(class = %self.class(), %id, thread = %me, error = %e, "spinlock try_lock failed");
            }
            e
        })
    }

    /// Release; succeeds without effect if the lock is not held
    pub fn unlock(&self, id: ObjectId) -> Result<()> {
        self.check_context(id)?;
        let me = thread::current_id();
        let _isr = IsrGuard::new(&self.dispatcher);
        self.objects
            .lock()
            .lookup_mut(id)?
            .surrender(me)
            .map_err(|e| {
                warn!(class = %self.class(), %id, thread = %me, error = %e, "spinlock unlock failed");
                e
            })
    }

    /// Free an unlocked spinlock
    pub fn destroy(&self, id: ObjectId) -> Result<()> {
        let _dispatch = DispatchGuard::new(&self.dispatcher);
        let mut table = self.objects.lock();

        if let Some(holder) = table.lookup(id)?.holder() {
            warn!(class = %self.class(), %id, %holder, "spinlock destroy while held rejected");
            return Err(SyncError::Busy);
        }

        table.close(id)?;
        debug!(class = %self.class(), %id, "spinlock destroyed");
        Ok(())
    }

    /// Whether `id` names an open spinlock of this pool
    pub fn is_open(&self, id: ObjectId) -> bool {
        let _isr = IsrGuard::new(&self.dispatcher);
        self.objects.lock().lookup(id).is_ok()
    }

    /// Current holder, if any
    pub fn holder(&self, id: ObjectId) -> Result<Option<ThreadId>> {
        let _isr = IsrGuard::new(&self.dispatcher);
        Ok(self.objects.lock().lookup(id)?.holder())
    }
}
