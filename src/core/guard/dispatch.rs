/*!
 * Dispatch Gate
 *
 * On a single processor, masking interrupts or disabling thread dispatch
 * means nothing else executes kernel code until the scope ends. Host threads
 * run truly in parallel, so the gate reproduces that exclusion explicitly: a
 * reentrant owner slot with two nesting counters.
 *
 * A context that blocks inside a scope (barrier wait) hands the gate off
 * entirely through [`Dispatcher::suspend`] and gets its exact levels back on
 * resume, the same way a context switch saves and restores the
 * dispatch-disable level of the outgoing thread.
 */

use super::traits::Guard;
use super::{GuardError, GuardResult};
use crate::core::id::ThreadId;
use crate::thread::{self, ThreadControl, WakeReason};
use parking_lot::{Condvar, Mutex};
use std::marker::PhantomData;

/// Nesting levels held by one execution context
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Levels {
    pub isr_disable: u32,
    pub dispatch_disable: u32,
}

impl Levels {
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.isr_disable == 0 && self.dispatch_disable == 0
    }
}

#[derive(Debug, Clone, Copy)]
enum Scope {
    Isr,
    Dispatch,
}

#[derive(Debug, Default)]
struct GateState {
    owner: Option<ThreadId>,
    levels: Levels,
}

/// The kernel's critical-section gate
#[derive(Debug, Default)]
pub struct Dispatcher {
    gate: Mutex<GateState>,
    released: Condvar,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Levels the calling context currently holds (zero if it does not own the gate)
    pub fn levels(&self) -> Levels {
        let me = thread::current_id();
        let gate = self.gate.lock();
        if gate.owner == Some(me) {
            gate.levels
        } else {
            Levels::default()
        }
    }

    /// Whether any context is inside a critical section
    pub fn is_held(&self) -> bool {
        self.gate.lock().owner.is_some()
    }

    fn enter(&self, scope: Scope) {
        let me = thread::current_id();
        let mut gate = self.gate.lock();
        loop {
            match gate.owner {
                Some(owner) if owner == me => break,
                None => {
                    gate.owner = Some(me);
                    break;
                }
                Some(_) => self.released.wait(&mut gate),
            }
        }
        match scope {
            Scope::Isr => gate.levels.isr_disable += 1,
            Scope::Dispatch => gate.levels.dispatch_disable += 1,
        }
    }

    fn leave(&self, scope: Scope) {
        let mut gate = self.gate.lock();
        debug_assert_eq!(gate.owner, Some(thread::current_id()));
        match scope {
            Scope::Isr => {
                debug_assert!(gate.levels.isr_disable > 0);
                gate.levels.isr_disable -= 1;
            }
            Scope::Dispatch => {
                debug_assert!(gate.levels.dispatch_disable > 0);
                gate.levels.dispatch_disable -= 1;
            }
        }
        if gate.levels.is_zero() {
            gate.owner = None;
            self.released.notify_one();
        }
    }

    /// Block `thread` (the caller) until a wait queue resumes it.
    ///
    /// The caller must own the gate. All of its levels are saved, the gate is
    /// released for other contexts, and the levels are reinstated before
    /// returning, so the caller's guards still balance when they drop.
    pub(crate) fn suspend(&self, thread: &ThreadControl) -> WakeReason {
        let saved = {
            let mut gate = self.gate.lock();
            debug_assert_eq!(gate.owner, Some(thread.id()));
            let saved = gate.levels;
            gate.owner = None;
            gate.levels = Levels::default();
            self.released.notify_one();
            saved
        };

        let reason = thread.park();

        let mut gate = self.gate.lock();
        while gate.owner.is_some() {
            self.released.wait(&mut gate);
        }
        gate.owner = Some(thread.id());
        gate.levels = saved;
        reason
    }
}

macro_rules! scope_guard {
    ($(#[$meta:meta])* $name:ident, $scope:expr, $label:literal) => {
        $(#[$meta])*
        #[must_use = "the critical section ends when the guard is dropped"]
        pub struct $name<'a> {
            dispatcher: &'a Dispatcher,
            active: bool,
            // Scopes belong to the context that opened them
            _not_send: PhantomData<*const ()>,
        }

        impl<'a> $name<'a> {
            pub fn new(dispatcher: &'a Dispatcher) -> Self {
                dispatcher.enter($scope);
                Self {
                    dispatcher,
                    active: true,
                    _not_send: PhantomData,
                }
            }
        }

        impl Guard for $name<'_> {
            fn resource_type(&self) -> &'static str {
                $label
            }

            fn is_active(&self) -> bool {
                self.active
            }

            fn release(&mut self) -> GuardResult<()> {
                if !self.active {
                    return Err(GuardError::AlreadyReleased);
                }
                self.active = false;
                self.dispatcher.leave($scope);
                Ok(())
            }
        }

        impl Drop for $name<'_> {
            fn drop(&mut self) {
                if self.active {
                    self.dispatcher.leave($scope);
                }
            }
        }
    };
}

scope_guard!(
    /// Interrupt-disable scope
    IsrGuard,
    Scope::Isr,
    "isr_disable"
);

scope_guard!(
    /// Dispatch-disable scope
    DispatchGuard,
    Scope::Dispatch,
    "dispatch_disable"
);
