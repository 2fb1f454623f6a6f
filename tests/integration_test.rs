use jobpool::{Config, JobPool, StopMode};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Poll `predicate` until it holds or five seconds pass.
fn wait_for(predicate: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !predicate() {
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(1));
    }
    true
}

/// A manually released gate a job can block on.
struct Gate {
    released: Mutex<bool>,
    cv: Condvar,
}

impl Gate {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            released: Mutex::new(false),
            cv: Condvar::new(),
        })
    }

    fn wait(&self) {
        let mut released = self.released.lock();
        while !*released {
            self.cv.wait(&mut released);
        }
    }

    fn open(&self) {
        *self.released.lock() = true;
        self.cv.notify_all();
    }
}

#[test]
fn test_basic_throughput() {
    let pool = JobPool::new(Config::default()).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..100 {
        let counter = counter.clone();
        assert!(pool.submit(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        }));
    }

    pool.wait_idle();

    assert_eq!(counter.load(Ordering::Relaxed), 100);

    let stats = pool.stats();
    assert_eq!(stats.submitted, 100);
    assert_eq!(stats.completed, 100);
    assert_eq!(stats.queued, 0);
    assert_eq!(stats.in_flight, 0);
}

#[test]
fn test_cancel_pending_discards_queued() {
    let pool = JobPool::new(Config::builder().worker_threads(1).build().unwrap()).unwrap();
    let executed = Arc::new(AtomicUsize::new(0));
    let gate = Gate::new();

    {
        let executed = executed.clone();
        let gate = gate.clone();
        assert!(pool.submit(move || {
            executed.fetch_add(1, Ordering::Relaxed);
            gate.wait();
        }));
    }

    for _ in 0..20 {
        let executed = executed.clone();
        assert!(pool.submit(move || {
            executed.fetch_add(1, Ordering::Relaxed);
        }));
    }

    assert!(wait_for(|| executed.load(Ordering::Relaxed) >= 1));

    thread::scope(|s| {
        let stopper = s.spawn(|| pool.stop(StopMode::CancelPending));

        // Stop clears the queue before waiting on in-flight work; hold the
        // gate shut until the discard is visible so the single worker cannot
        // sneak another job in.
        assert!(wait_for(|| pool.stats().queued == 0));

        gate.open();
        stopper.join().unwrap();
    });

    assert_eq!(executed.load(Ordering::Relaxed), 1);
    assert!(!pool.submit(|| {}));
}

#[test]
fn test_drain_preserves_all_work() {
    let pool = JobPool::new(Config::builder().worker_threads(2).build().unwrap()).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..50 {
        let counter = counter.clone();
        assert!(pool.submit(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        }));
    }

    pool.stop(StopMode::Drain);

    assert_eq!(counter.load(Ordering::Relaxed), 50);
    assert_eq!(pool.stats().completed, 50);
}

#[test]
fn test_panic_containment() {
    let pool = JobPool::new(Config::builder().worker_threads(2).build().unwrap()).unwrap();

    for _ in 0..10 {
        assert!(pool.submit(|| {
            panic!("intentional test panic");
        }));
    }

    pool.wait_idle();
    assert_eq!(pool.stats().completed, 10);

    // The pool stays usable after panics.
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let counter = counter.clone();
        assert!(pool.submit(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        }));
    }

    pool.wait_idle();
    assert_eq!(counter.load(Ordering::Relaxed), 1);
    assert_eq!(pool.stats().completed, 11);
}

#[test]
fn test_auto_sizing() {
    let pool = JobPool::new(Config::default()).unwrap();
    assert!(pool.stats().worker_count >= 1);
}

#[test]
fn test_explicit_worker_count() {
    let pool = JobPool::new(Config::builder().worker_threads(3).build().unwrap()).unwrap();
    assert_eq!(pool.stats().worker_count, 3);
}

#[test]
fn test_stop_is_idempotent() {
    let pool = JobPool::new(Config::builder().worker_threads(2).build().unwrap()).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..10 {
        let counter = counter.clone();
        pool.submit(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
    }

    pool.stop(StopMode::Drain);
    let first = pool.stats();

    // A second stop, even with the other mode, is a prompt no-op.
    pool.stop(StopMode::CancelPending);
    pool.stop(StopMode::Drain);

    let second = pool.stats();
    assert_eq!(first, second);
    assert_eq!(second.completed, 10);
    assert!(!pool.submit(|| {}));
}

#[test]
fn test_fifo_order_single_worker() {
    let pool = JobPool::new(Config::builder().worker_threads(1).build().unwrap()).unwrap();
    let order = Arc::new(Mutex::new(Vec::new()));

    for i in 0..32 {
        let order = order.clone();
        assert!(pool.submit(move || {
            order.lock().push(i);
        }));
    }

    pool.wait_idle();

    let order = order.lock();
    assert_eq!(*order, (0..32).collect::<Vec<_>>());
}

#[test]
fn test_reentrant_submit() {
    let pool = Arc::new(JobPool::new(Config::builder().worker_threads(1).build().unwrap()).unwrap());
    let counter = Arc::new(AtomicUsize::new(0));

    {
        let inner_pool = pool.clone();
        let counter = counter.clone();
        assert!(pool.submit(move || {
            counter.fetch_add(1, Ordering::Relaxed);

            let counter = counter.clone();
            assert!(inner_pool.submit(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            }));
        }));
    }

    pool.wait_idle();
    assert_eq!(counter.load(Ordering::Relaxed), 2);
    assert_eq!(pool.stats().submitted, 2);
}

#[test]
fn test_labeled_submit_counts_like_plain() {
    let pool = JobPool::new(Config::builder().worker_threads(2).build().unwrap()).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..5 {
        let counter = counter.clone();
        assert!(pool.submit_labeled("physics-step", move || {
            counter.fetch_add(1, Ordering::Relaxed);
        }));
    }

    pool.wait_idle();
    assert_eq!(counter.load(Ordering::Relaxed), 5);
    assert_eq!(pool.stats().submitted, 5);
    assert_eq!(pool.stats().completed, 5);
}

#[test]
fn test_counters_monotonic_under_load() {
    let pool = Arc::new(JobPool::new(Config::builder().worker_threads(4).build().unwrap()).unwrap());

    thread::scope(|s| {
        let producer_pool = pool.clone();
        s.spawn(move || {
            for _ in 0..500 {
                producer_pool.submit(|| {});
            }
        });

        let mut last_submitted = 0;
        let mut last_completed = 0;
        for _ in 0..100 {
            let stats = pool.stats();
            assert!(stats.submitted >= last_submitted);
            assert!(stats.completed >= last_completed);
            last_submitted = stats.submitted;
            last_completed = stats.completed;
        }
    });

    pool.wait_idle();
    let stats = pool.stats();
    assert_eq!(stats.submitted, stats.completed);
}

#[test]
fn test_wait_idle_observes_gated_task() {
    let pool = JobPool::new(Config::builder().worker_threads(1).build().unwrap()).unwrap();
    let gate = Gate::new();
    let done = Arc::new(AtomicUsize::new(0));

    {
        let gate = gate.clone();
        let done = done.clone();
        assert!(pool.submit(move || {
            gate.wait();
            done.fetch_add(1, Ordering::Relaxed);
        }));
    }

    thread::scope(|s| {
        let waiter_pool = &pool;
        let waiter = s.spawn(move || waiter_pool.wait_idle());

        // The waiter cannot return while the job is gated.
        assert!(wait_for(|| pool.stats().in_flight == 1));

        gate.open();
        waiter.join().unwrap();
    });

    assert_eq!(done.load(Ordering::Relaxed), 1);
    assert_eq!(pool.stats().in_flight, 0);
}

#[test]
fn test_stop_while_wait_idle_blocked() {
    let pool = JobPool::new(Config::builder().worker_threads(1).build().unwrap()).unwrap();
    let gate = Gate::new();
    let done = Arc::new(AtomicUsize::new(0));

    {
        let gate = gate.clone();
        let done = done.clone();
        assert!(pool.submit(move || {
            gate.wait();
            done.fetch_add(1, Ordering::Relaxed);
        }));
    }

    assert!(wait_for(|| pool.stats().in_flight == 1));

    thread::scope(|s| {
        let waiter_pool = &pool;
        let waiter = s.spawn(move || waiter_pool.wait_idle());

        let stopper_pool = &pool;
        let stopper = s.spawn(move || stopper_pool.stop(StopMode::Drain));

        // Both threads are blocked on the gated job; once stop has latched
        // the accepting flag, new submissions are rejected. Probes that land
        // before the latch are counted so the totals below stay exact.
        let stray = Arc::new(AtomicUsize::new(0));
        {
            let stray = stray.clone();
            let probe_pool = &pool;
            assert!(wait_for(move || {
                if probe_pool.submit(|| {}) {
                    stray.fetch_add(1, Ordering::Relaxed);
                    false
                } else {
                    true
                }
            }));
        }
        assert_eq!(pool.stats().in_flight, 1);

        gate.open();

        waiter.join().unwrap();
        stopper.join().unwrap();

        assert_eq!(done.load(Ordering::Relaxed), 1);

        let stats = pool.stats();
        assert_eq!(stats.completed, 1 + stray.load(Ordering::Relaxed) as u64);
        assert_eq!(stats.queued, 0);
        assert_eq!(stats.in_flight, 0);
    });

    assert!(!pool.submit(|| {}));
}

#[test]
fn test_drop_drains() {
    let counter = Arc::new(AtomicUsize::new(0));

    {
        let pool = JobPool::new(Config::builder().worker_threads(2).build().unwrap()).unwrap();
        for _ in 0..25 {
            let counter = counter.clone();
            assert!(pool.submit(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            }));
        }
        // Dropped here: stop(Drain) runs all queued work first.
    }

    assert_eq!(counter.load(Ordering::Relaxed), 25);
}
