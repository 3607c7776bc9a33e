/*!
 * Synchronization Primitives
 *
 * API-independent barrier and spinlock cores. Each object class is a pool
 * that pairs an object information table with the kernel's dispatch gate;
 * the POSIX and classic surfaces are thin translations on top.
 */

mod barrier;
mod spinlock;

pub use barrier::{
    Arrival, BarrierAttributes, BarrierPool, BarrierWait, CoreBarrier, ReleaseDiscipline,
};
pub use spinlock::{CoreSpinlock, SpinlockPool};
