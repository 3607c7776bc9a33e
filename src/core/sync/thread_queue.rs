/*!
 * Thread Queue
 *
 * Ordered collection of threads blocked on one synchronization object.
 *
 * # Design: Split Enqueue and Suspend
 *
 * The queue lives inside a control block that is only reachable while the
 * object table is locked, and a thread must not sleep holding that lock.
 * `enqueue` therefore hands back a [`Suspension`]; the caller drops the table
 * lock (still inside its dispatch-disable scope) and then calls
 * [`Suspension::wait`], which releases the gate and parks. A waker needs the
 * gate to dequeue anyone, so no wakeup can slip in between the two steps
 * unobserved.
 */

use crate::core::guard::Dispatcher;
use crate::thread::{ThreadControl, WakeReason};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

/// Order in which blocked threads are resumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitOrder {
    /// Arrival order
    #[default]
    Fifo,
    /// Most urgent (numerically lowest) priority first, arrival order among equals
    Priority,
}

/// Blocked threads of one object
#[derive(Debug, Default)]
pub struct ThreadQueue {
    order: WaitOrder,
    waiters: VecDeque<Arc<ThreadControl>>,
}

impl ThreadQueue {
    pub fn new(order: WaitOrder) -> Self {
        Self {
            order,
            waiters: VecDeque::new(),
        }
    }

    #[inline]
    pub fn order(&self) -> WaitOrder {
        self.order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }

    /// Queue `thread` and mark it blocked; first half of enqueue-and-suspend
    pub fn enqueue(&mut self, thread: Arc<ThreadControl>) -> Suspension {
        thread.block();

        match self.order {
            WaitOrder::Fifo => self.waiters.push_back(thread.clone()),
            WaitOrder::Priority => {
                let priority = thread.priority();
                let at = self
                    .waiters
                    .iter()
                    .position(|queued| queued.priority() > priority)
                    .unwrap_or(self.waiters.len());
                self.waiters.insert(at, thread.clone());
            }
        }

        trace!(thread = %thread.id(), queued = self.waiters.len(), "thread enqueued");
        Suspension { thread }
    }

    /// Remove and resume the head of the queue
    pub fn dequeue_one(&mut self) -> Option<Arc<ThreadControl>> {
        let thread = self.waiters.pop_front()?;
        thread.unblock(WakeReason::Satisfied);
        trace!(thread = %thread.id(), "thread dequeued");
        Some(thread)
    }

    /// Resume every queued thread; returns how many were resumed
    pub fn dequeue_all(&mut self) -> usize {
        self.flush(WakeReason::Satisfied)
    }

    /// Resume every queued thread with `reason`; returns how many were resumed
    pub fn flush(&mut self, reason: WakeReason) -> usize {
        let count = self.waiters.len();
        for thread in self.waiters.drain(..) {
            thread.unblock(reason);
        }
        if count > 0 {
            trace!(count, ?reason, "thread queue flushed");
        }
        count
    }
}

/// A queued thread that has not gone to sleep yet
#[must_use = "an enqueued thread must suspend"]
#[derive(Debug)]
pub struct Suspension {
    thread: Arc<ThreadControl>,
}

impl Suspension {
    /// Second half of enqueue-and-suspend: hand off the gate and sleep until dequeued
    pub fn wait(self, dispatcher: &Dispatcher) -> WakeReason {
        dispatcher.suspend(&self.thread)
    }
}
