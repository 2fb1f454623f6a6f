//! Shared queue and counter state.
//!
//! One mutex guards the FIFO queue; the work condvar wakes workers on new
//! tasks or stop, the idle condvar wakes drain waiters on task completion.
//! Both share the mutex so predicate evaluation is atomic with the state
//! change that triggers it.

use super::task::TaskItem;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[cfg(feature = "telemetry")]
use crate::telemetry::slot::WorkerSlot;
#[cfg(feature = "telemetry")]
use crate::util::CachePadded;

/// State shared between the pool handle and its workers.
pub(crate) struct Shared {
    pub(crate) queue: Mutex<VecDeque<TaskItem>>,
    pub(crate) work_cv: Condvar,
    pub(crate) idle_cv: Condvar,

    /// One-way latch: cleared once at the start of stop, never set again.
    /// Producers check it twice, once lock-free and once under the lock.
    pub(crate) accepting: AtomicBool,

    /// Cooperative stop request, checked by workers under the queue lock.
    pub(crate) stop: AtomicBool,

    pub(crate) submitted: AtomicU64,
    pub(crate) completed: AtomicU64,
    pub(crate) in_flight: AtomicU64,

    #[cfg(feature = "telemetry")]
    pub(crate) next_task_id: AtomicU64,
    #[cfg(feature = "telemetry")]
    pub(crate) slots: Vec<CachePadded<WorkerSlot>>,
}

impl Shared {
    pub(crate) fn new(worker_count: usize) -> Self {
        #[cfg(not(feature = "telemetry"))]
        let _ = worker_count;

        Self {
            queue: Mutex::new(VecDeque::new()),
            work_cv: Condvar::new(),
            idle_cv: Condvar::new(),
            accepting: AtomicBool::new(true),
            stop: AtomicBool::new(false),
            submitted: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            in_flight: AtomicU64::new(0),

            #[cfg(feature = "telemetry")]
            next_task_id: AtomicU64::new(1),
            #[cfg(feature = "telemetry")]
            slots: (0..worker_count)
                .map(|_| CachePadded::new(WorkerSlot::new()))
                .collect(),
        }
    }

    /// Block until the queue is empty and nothing is in flight, both
    /// evaluated under the queue lock.
    pub(crate) fn wait_idle(&self) {
        let mut queue = self.queue.lock();
        while !(queue.is_empty() && self.in_flight.load(Ordering::Acquire) == 0) {
            self.idle_cv.wait(&mut queue);
        }
    }
}
