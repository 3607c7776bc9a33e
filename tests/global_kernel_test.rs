/*!
 * Global Kernel Tests
 *
 * The process-wide instance is shared by every test in this binary
 */

use rtos_sync_core::{Kernel, KernelConfig, PthreadSpinlock, PTHREAD_PROCESS_PRIVATE};
use serial_test::serial;

fn config() -> KernelConfig {
    KernelConfig::default().with_posix_spinlocks(2)
}

fn kernel() -> &'static Kernel {
    Kernel::init_global(config())
}

#[test]
#[serial]
fn test_first_init_wins() {
    let kernel = kernel();
    assert_eq!(kernel.config(), &config());

    let again = Kernel::init_global(KernelConfig::default());
    assert!(std::ptr::eq(kernel, again));
    assert!(std::ptr::eq(kernel, Kernel::global()));
    assert_eq!(again.config(), &config());
}

#[test]
#[serial]
fn test_global_spinlock_round_trip() {
    let posix = kernel().posix();
    let mut spinlock = PthreadSpinlock::NONE;

    assert_eq!(posix.spin_init(Some(&mut spinlock), PTHREAD_PROCESS_PRIVATE), 0);
    assert_eq!(posix.spin_lock(Some(&spinlock)), 0);
    assert_eq!(posix.spin_unlock(Some(&spinlock)), 0);
    assert_eq!(posix.spin_destroy(Some(&spinlock)), 0);
    assert_eq!(kernel().spinlocks().active_count(), 0);
}
