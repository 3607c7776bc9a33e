/*!
 * Synchronization Building Blocks
 *
 * - Thread queues: ordered sets of blocked threads with FIFO or priority
 *   resume order, shared by every blocking primitive
 * - Spin-wait backoff: pacing for busy-wait acquisition loops
 */

mod config;
mod spinwait;
mod thread_queue;

pub use config::SpinConfig;
pub use spinwait::SpinWait;
pub use thread_queue::{Suspension, ThreadQueue, WaitOrder};
