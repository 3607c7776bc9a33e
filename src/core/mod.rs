/*!
 * Core Module
 * Fundamental kernel types, error handling, critical sections and wait queues
 */

pub mod errors;
pub mod guard;
pub mod id;
pub mod limits;
pub mod sync;
pub mod tracer;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use guard::{
    in_interrupt, isr_nest_level, DispatchGuard, Dispatcher, Guard, GuardError, GuardResult,
    InterruptScope, IsrGuard, Levels,
};
pub use id::ThreadId;
pub use types::*;
