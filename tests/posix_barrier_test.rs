/*!
 * POSIX Barrier Integration Tests
 *
 * Round completion, reuse and destroy semantics through the pthread surface
 */

use nix::errno::Errno;
use rtos_sync_core::{
    Kernel, KernelConfig, PthreadBarrier, PthreadBarrierAttr, PTHREAD_BARRIER_SERIAL_THREAD,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const EBUSY: i32 = Errno::EBUSY as i32;
const EINVAL: i32 = Errno::EINVAL as i32;

fn wait_for_waiting(kernel: &Kernel, barrier: PthreadBarrier, count: u32) {
    while kernel.barriers().waiting(barrier).unwrap() < count {
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn test_capacity_two_scenario() {
    let kernel = Arc::new(Kernel::default());
    let mut barrier = PthreadBarrier::NONE;
    assert_eq!(kernel.posix().barrier_init(Some(&mut barrier), None, 2), 0);

    let a = {
        let kernel = kernel.clone();
        thread::spawn(move || kernel.posix().barrier_wait(Some(&barrier)))
    };
    wait_for_waiting(&kernel, barrier, 1);
    assert!(!a.is_finished());

    let b = {
        let kernel = kernel.clone();
        thread::spawn(move || kernel.posix().barrier_wait(Some(&barrier)))
    };

    let mut results = vec![a.join().unwrap(), b.join().unwrap()];
    results.sort();
    assert_eq!(results, vec![PTHREAD_BARRIER_SERIAL_THREAD, 0]);
    assert_eq!(kernel.barriers().waiting(barrier), Ok(0));

    // The next round starts from zero and blocks again
    let c = {
        let kernel = kernel.clone();
        thread::spawn(move || kernel.posix().barrier_wait(Some(&barrier)))
    };
    wait_for_waiting(&kernel, barrier, 1);
    thread::sleep(Duration::from_millis(20));
    assert!(!c.is_finished());

    assert_eq!(
        kernel.posix().barrier_wait(Some(&barrier)),
        PTHREAD_BARRIER_SERIAL_THREAD
    );
    assert_eq!(c.join().unwrap(), 0);
}

#[test]
fn test_every_capacity_releases_all_parties() {
    for parties in 1..=6u32 {
        let kernel = Arc::new(Kernel::default());
        let mut barrier = PthreadBarrier::NONE;
        assert_eq!(kernel.posix().barrier_init(Some(&mut barrier), None, parties), 0);

        let serial = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..parties)
            .map(|_| {
                let kernel = kernel.clone();
                let serial = serial.clone();
                thread::spawn(move || {
                    let status = kernel.posix().barrier_wait(Some(&barrier));
                    if status == PTHREAD_BARRIER_SERIAL_THREAD {
                        serial.fetch_add(1, Ordering::SeqCst);
                    }
                    status
                })
            })
            .collect();

        for handle in handles {
            let status = handle.join().unwrap();
            assert!(status == 0 || status == PTHREAD_BARRIER_SERIAL_THREAD);
        }
        assert_eq!(serial.load(Ordering::SeqCst), 1, "parties = {parties}");
        assert_eq!(kernel.barriers().waiting(barrier), Ok(0));
        assert_eq!(kernel.posix().barrier_destroy(Some(&barrier)), 0);
    }
}

#[test]
fn test_destroy_refused_while_threads_wait() {
    let kernel = Arc::new(Kernel::default());
    let mut barrier = PthreadBarrier::NONE;
    let attr = PthreadBarrierAttr::new();
    assert_eq!(
        kernel.posix().barrier_init(Some(&mut barrier), Some(&attr), 3),
        0
    );

    let waiters: Vec<_> = (0..2)
        .map(|_| {
            let kernel = kernel.clone();
            thread::spawn(move || kernel.posix().barrier_wait(Some(&barrier)))
        })
        .collect();
    wait_for_waiting(&kernel, barrier, 2);

    assert_eq!(kernel.posix().barrier_destroy(Some(&barrier)), EBUSY);
    assert_eq!(kernel.barriers().waiting(barrier), Ok(2));

    assert_eq!(
        kernel.posix().barrier_wait(Some(&barrier)),
        PTHREAD_BARRIER_SERIAL_THREAD
    );
    for waiter in waiters {
        assert_eq!(waiter.join().unwrap(), 0);
    }

    // Right after a full release nobody is queued
    assert_eq!(kernel.posix().barrier_destroy(Some(&barrier)), 0);
    assert_eq!(kernel.posix().barrier_wait(Some(&barrier)), EINVAL);
}

#[test]
fn test_pool_slot_recycled_after_destroy() {
    let kernel = Kernel::new(KernelConfig::default().with_posix_barriers(1));
    let posix = kernel.posix();
    let mut first = PthreadBarrier::NONE;
    let mut second = PthreadBarrier::NONE;

    assert_eq!(posix.barrier_init(Some(&mut first), None, 1), 0);
    assert_eq!(
        posix.barrier_init(Some(&mut second), None, 1),
        Errno::EAGAIN as i32
    );
    assert_eq!(posix.barrier_destroy(Some(&first)), 0);
    assert_eq!(posix.barrier_init(Some(&mut second), None, 1), 0);
    assert_eq!(second, first);
}
