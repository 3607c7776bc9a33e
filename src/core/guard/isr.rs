/*!
 * Interrupt Context
 *
 * Simulated interrupt handler entry. The nesting level tells failure paths
 * and context checks whether the code runs on behalf of an interrupt.
 */

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static ISR_NEST_LEVEL: Cell<u32> = const { Cell::new(0) };
}

/// Current interrupt nesting depth of this execution context
#[inline]
pub fn isr_nest_level() -> u32 {
    ISR_NEST_LEVEL.with(Cell::get)
}

/// Whether this execution context is running an interrupt handler
#[inline]
pub fn in_interrupt() -> bool {
    isr_nest_level() > 0
}

/// Marks the current context as an interrupt handler until dropped
#[must_use = "the interrupt context ends when the scope is dropped"]
pub struct InterruptScope {
    _not_send: PhantomData<*const ()>,
}

impl InterruptScope {
    pub fn enter() -> Self {
        ISR_NEST_LEVEL.with(|level| level.set(level.get() + 1));
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for InterruptScope {
    fn drop(&mut self) {
        ISR_NEST_LEVEL.with(|level| level.set(level.get() - 1));
    }
}
