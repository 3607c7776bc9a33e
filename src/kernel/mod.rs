/*!
 * Kernel Instance
 *
 * Owns the dispatch gate and every object class pool. One process-wide
 * instance is reachable through [`Kernel::global`]; tests build their own
 * with [`Kernel::new`] so pool capacities and contents never leak between
 * them.
 */

mod config;

pub use config::KernelConfig;

use crate::classic::Classic;
use crate::core::guard::{Dispatcher, InterruptScope};
use crate::core::types::ObjectIndex;
use crate::objects::ObjectClass;
use crate::posix::Posix;
use crate::score::{BarrierPool, SpinlockPool};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

static GLOBAL_KERNEL: OnceLock<Kernel> = OnceLock::new();

/// Occupancy of one object class pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolUsage {
    pub class: ObjectClass,
    pub active: usize,
    pub maximum: ObjectIndex,
}

#[derive(Debug)]
pub struct Kernel {
    config: KernelConfig,
    dispatcher: Arc<Dispatcher>,
    posix_barriers: BarrierPool,
    posix_spinlocks: SpinlockPool,
    classic_barriers: BarrierPool,
}

impl Kernel {
    pub fn new(config: KernelConfig) -> Self {
        let dispatcher = Arc::new(Dispatcher::new());
        let node = config.node;

        let posix_barriers = BarrierPool::new(
            dispatcher.clone(),
            ObjectClass::PosixBarrier,
            node,
            config.maximum_posix_barriers,
        );
        let posix_spinlocks = SpinlockPool::new(
            dispatcher.clone(),
            ObjectClass::PosixSpinlock,
            node,
            config.maximum_posix_spinlocks,
        )
        .with_spin(config.spin)
        .with_isr_locking(config.isr_spinlocks);
        let classic_barriers = BarrierPool::new(
            dispatcher.clone(),
            ObjectClass::ClassicBarrier,
            node,
            config.maximum_barriers,
        );

        info!(
            node,
            posix_barriers = config.maximum_posix_barriers,
            posix_spinlocks = config.maximum_posix_spinlocks,
            barriers = config.maximum_barriers,
            isr_spinlocks = config.isr_spinlocks,
            "kernel object pools configured"
        );

        Self {
            config,
            dispatcher,
            posix_barriers,
            posix_spinlocks,
            classic_barriers,
        }
    }

    /// Install the process-wide kernel
    ///
    /// Only the first call configures it; later calls return the existing
    /// instance and leave its configuration untouched.
    pub fn init_global(config: KernelConfig) -> &'static Kernel {
        let mut fresh = false;
        let kernel = GLOBAL_KERNEL.get_or_init(|| {
            fresh = true;
            Kernel::new(config.clone())
        });
        if !fresh && kernel.config != config {
            warn!("global kernel already configured; new configuration ignored");
        }
        kernel
    }

    /// The process-wide kernel, built with the default configuration on first use
    pub fn global() -> &'static Kernel {
        GLOBAL_KERNEL.get_or_init(|| Kernel::new(KernelConfig::default()))
    }

    #[inline]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    #[inline]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// POSIX barrier pool
    #[inline]
    pub fn barriers(&self) -> &BarrierPool {
        &self.posix_barriers
    }

    /// POSIX spinlock pool
    #[inline]
    pub fn spinlocks(&self) -> &SpinlockPool {
        &self.posix_spinlocks
    }

    /// Classic barrier pool
    #[inline]
    pub fn classic_barriers(&self) -> &BarrierPool {
        &self.classic_barriers
    }

    /// `pthread_*` style entry points with errno results
    pub fn posix(&self) -> Posix<'_> {
        Posix::new(self)
    }

    /// Native barrier directives
    pub fn classic(&self) -> Classic<'_> {
        Classic::new(self)
    }

    /// Run `handler` as an interrupt service routine on the calling thread
    pub fn interrupt<R>(&self, handler: impl FnOnce(&Self) -> R) -> R {
        let _isr = InterruptScope::enter();
        handler(self)
    }

    /// Occupancy of every pool
    pub fn usage(&self) -> Vec<PoolUsage> {
        let barriers = |pool: &BarrierPool| PoolUsage {
            class: pool.class(),
            active: pool.active_count(),
            maximum: pool.maximum(),
        };

        vec![
            barriers(&self.posix_barriers),
            PoolUsage {
                class: self.posix_spinlocks.class(),
                active: self.posix_spinlocks.active_count(),
                maximum: self.posix_spinlocks.maximum(),
            },
            barriers(&self.classic_barriers),
        ]
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new(KernelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::guard::in_interrupt;
    use crate::core::SyncError;
    use crate::objects::ObjectName;
    use crate::score::BarrierAttributes;
    use serial_test::serial;

    #[test]
    fn test_pools_sized_from_config() {
        let kernel = Kernel::new(
            KernelConfig::default()
                .with_posix_barriers(2)
                .with_posix_spinlocks(1)
                .with_barriers(0),
        );

        let usage = kernel.usage();
        assert_eq!(usage.len(), 3);
        assert_eq!(usage[0].maximum, 2);
        assert_eq!(usage[1].maximum, 1);
        assert_eq!(usage[2].maximum, 0);

        assert_eq!(
            kernel
                .classic_barriers()
                .create(ObjectName::from(b"NONE"), BarrierAttributes::automatic(1)),
            Err(SyncError::ResourceExhausted)
        );
    }

    #[test]
    fn test_classes_do_not_share_identifiers() {
        let kernel = Kernel::default();
        let posix = kernel
            .barriers()
            .create(ObjectName::NONE, BarrierAttributes::automatic(2))
            .unwrap();
        let classic = kernel
            .classic_barriers()
            .create(ObjectName::from(b"BAR1"), BarrierAttributes::automatic(2))
            .unwrap();

        assert_eq!(posix.index(), classic.index());
        assert_ne!(posix, classic);
        assert_eq!(kernel.classic_barriers().waiting(posix), Err(SyncError::InvalidId));
        assert_eq!(kernel.spinlocks().holder(posix), Err(SyncError::InvalidId));
    }

    #[test]
    fn test_interrupt_scope_is_scoped() {
        let kernel = Kernel::default();
        assert!(kernel.interrupt(|_| in_interrupt()));
        assert!(!in_interrupt());
    }

    #[test]
    #[serial]
    fn test_global_is_singleton() {
        let first = Kernel::global();
        let second = Kernel::init_global(KernelConfig::default().with_barriers(1));
        assert!(std::ptr::eq(first, second));
        assert_eq!(second.config(), first.config());
    }
}
