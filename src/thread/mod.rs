/*!
 * Thread Control
 *
 * Every host thread that touches the kernel gets a control block on first
 * contact. The control block carries the thread's identity, priority and
 * blocking state; wait queues hold references to it and resume it through
 * the state machine below.
 *
 * ```text
 * Running --block()--> Blocked --unblock(reason)--> Readied(reason) --park()--> Running
 * ```
 */

use crate::core::id::{ThreadId, THREAD_IDS};
use crate::core::limits::DEFAULT_THREAD_PRIORITY;
use crate::core::types::Priority;
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Why a blocked thread was resumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WakeReason {
    /// The condition it waited for was met
    Satisfied,
    /// The object it waited on was deleted
    ObjectDeleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitState {
    Running,
    Blocked,
    Readied(WakeReason),
}

/// Kernel-side record of one thread
pub struct ThreadControl {
    id: ThreadId,
    name: Option<String>,
    priority: AtomicU8,
    state: Mutex<WaitState>,
    wakeup: Condvar,
}

impl ThreadControl {
    fn new(name: Option<String>) -> Self {
        Self {
            id: ThreadId(THREAD_IDS.next()),
            name,
            priority: AtomicU8::new(DEFAULT_THREAD_PRIORITY),
            state: Mutex::new(WaitState::Running),
            wakeup: Condvar::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> ThreadId {
        self.id
    }

    /// Host thread name, if it had one when first seen
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority.load(Ordering::Relaxed)
    }

    /// Change the priority used by priority-ordered wait queues
    ///
    /// Takes effect on the next enqueue; a thread already queued keeps its position.
    pub fn set_priority(&self, priority: Priority) {
        self.priority.store(priority, Ordering::Relaxed);
    }

    /// Whether the thread currently sits in a wait queue
    pub fn is_blocked(&self) -> bool {
        matches!(*self.state.lock(), WaitState::Blocked)
    }

    /// Mark the thread blocked; it must not already be in a wait queue
    pub(crate) fn block(&self) {
        let mut state = self.state.lock();
        debug_assert_eq!(
            *state,
            WaitState::Running,
            "thread {} enqueued while not running",
            self.id
        );
        *state = WaitState::Blocked;
    }

    /// Resume a blocked thread. Returns false if it was not blocked.
    pub(crate) fn unblock(&self, reason: WakeReason) -> bool {
        let mut state = self.state.lock();
        if *state != WaitState::Blocked {
            return false;
        }
        *state = WaitState::Readied(reason);
        self.wakeup.notify_one();
        true
    }

    /// Sleep until `unblock` has been called, consuming the wake reason
    pub(crate) fn park(&self) -> WakeReason {
        let mut state = self.state.lock();
        loop {
            match *state {
                WaitState::Readied(reason) => {
                    *state = WaitState::Running;
                    return reason;
                }
                WaitState::Blocked => self.wakeup.wait(&mut state),
                // Never blocked: nothing to wait for
                WaitState::Running => return WakeReason::Satisfied,
            }
        }
    }
}

impl fmt::Debug for ThreadControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadControl")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority())
            .field("state", &*self.state.lock())
            .finish()
    }
}

thread_local! {
    static CURRENT: Arc<ThreadControl> =
        Arc::new(ThreadControl::new(std::thread::current().name().map(str::to_owned)));
}

/// Control block of the calling thread
pub fn current() -> Arc<ThreadControl> {
    CURRENT.with(Arc::clone)
}

/// ID of the calling thread
pub fn current_id() -> ThreadId {
    CURRENT.with(|thread| thread.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_current_is_stable_per_thread() {
        let a = current();
        let b = current();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(current_id(), a.id());
        assert_ne!(a.id().0, 0);

        let other = thread::spawn(current_id).join().unwrap();
        assert_ne!(other, a.id());
    }

    #[test]
    fn test_unblock_before_park() {
        let me = current();
        me.block();
        assert!(me.is_blocked());
        assert!(me.unblock(WakeReason::ObjectDeleted));
        assert!(!me.unblock(WakeReason::Satisfied));
        assert_eq!(me.park(), WakeReason::ObjectDeleted);
        assert!(!me.is_blocked());
    }

    #[test]
    fn test_park_waits_for_unblock() {
        let (tx, rx) = std::sync::mpsc::channel();
        let handle = thread::spawn(move || {
            let me = current();
            me.block();
            tx.send(me.clone()).unwrap();
            me.park()
        });

        let parked = rx.recv().unwrap();
        thread::sleep(Duration::from_millis(20));
        assert!(parked.is_blocked());
        assert!(parked.unblock(WakeReason::Satisfied));
        assert_eq!(handle.join().unwrap(), WakeReason::Satisfied);
    }

    #[test]
    fn test_priority_default_and_update() {
        let me = current();
        let before = me.priority();
        me.set_priority(5);
        assert_eq!(me.priority(), 5);
        me.set_priority(before);
    }
}
