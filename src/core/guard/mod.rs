/*!
 * Critical Section Guards
 *
 * RAII scopes that make multi-step kernel state transitions atomic.
 *
 * ## Scopes
 *
 * - **IsrGuard**: interrupt-disable scope, for the shortest transitions
 *   (test-and-set of an owner field)
 * - **DispatchGuard**: dispatch-disable scope, for longer transitions
 *   (walking a wait queue)
 * - **InterruptScope**: marks the current context as an interrupt handler
 *
 * Both critical-section scopes are reentrant and share one gate per kernel:
 * while a context holds either, no other context runs kernel code. Levels are
 * restored on every exit path because release happens in `Drop`.
 *
 * ## Example
 *
 * ```rust
 * use rtos_sync_core::core::guard::{Dispatcher, DispatchGuard, IsrGuard};
 *
 * let dispatcher = Dispatcher::new();
 * {
 *     let _dispatch = DispatchGuard::new(&dispatcher);
 *     let _isr = IsrGuard::new(&dispatcher);
 *     assert_eq!(dispatcher.levels().dispatch_disable, 1);
 *     assert_eq!(dispatcher.levels().isr_disable, 1);
 * }
 * assert!(dispatcher.levels().is_zero());
 * ```
 */

mod dispatch;
mod isr;
mod traits;

pub use dispatch::{DispatchGuard, Dispatcher, IsrGuard, Levels};
pub use isr::{in_interrupt, isr_nest_level, InterruptScope};
pub use traits::Guard;

/// Result type for guard operations
pub type GuardResult<T> = Result<T, GuardError>;

/// Errors that can occur during guard operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("Resource already released")]
    AlreadyReleased,
}
