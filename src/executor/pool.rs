use super::queue::Shared;
use super::task::{Job, TaskItem};
use super::worker::Worker;
use crate::config::Config;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::debug;

#[cfg(feature = "telemetry")]
use crate::telemetry::{Diagnostics, QueuedTaskInfo, WorkerDiagnostics};

/// Shutdown mode for [`JobPool::stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopMode {
    /// Execute all already-queued jobs before stopping.
    #[default]
    Drain,
    /// Discard queued jobs; wait only for in-flight ones.
    CancelPending,
}

/// Point-in-time counter snapshot.
///
/// `queued` is taken under the queue lock; the remaining counters are
/// independent atomic reads and need not be mutually consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    /// Number of live worker threads (0 after stop).
    pub worker_count: u32,
    /// Jobs currently waiting in the queue.
    pub queued: u64,
    /// Jobs currently executing inside a worker.
    pub in_flight: u64,
    /// Total jobs ever accepted.
    pub submitted: u64,
    /// Total jobs whose closure returned, normally or by panicking.
    pub completed: u64,
}

struct WorkerHandle {
    index: u32,
    thread: Option<JoinHandle<()>>,
}

/// A fixed-size pool of worker threads executing jobs from a shared FIFO
/// queue.
///
/// Jobs are opaque, fire-and-forget closures: no result values, no
/// priorities, no per-job cancellation. Submissions are accepted until
/// [`stop`](Self::stop) is called (or the pool is dropped, which drains);
/// after that every submission returns `false`.
///
/// Dropping the pool runs `stop(StopMode::Drain)`, so a job that never
/// returns will block drop forever. Callers own job termination.
pub struct JobPool {
    shared: Arc<Shared>,
    workers: Mutex<Vec<WorkerHandle>>,
}

impl JobPool {
    /// Create a pool with `config.resolved_worker_threads()` workers
    /// already spawned and parked on the work condition.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let count = config.resolved_worker_threads();
        let shared = Arc::new(Shared::new(count as usize));

        let mut workers = Vec::with_capacity(count as usize);

        for index in 0..count {
            let worker = Worker {
                index,
                shared: shared.clone(),
            };

            let mut builder =
                thread::Builder::new().name(format!("{}-{}", config.thread_name_prefix, index));

            if let Some(stack_size) = config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            let thread = builder
                .spawn(move || worker.run())
                .map_err(|e| Error::pool(format!("failed to spawn worker {index}: {e}")))?;

            workers.push(WorkerHandle {
                index,
                thread: Some(thread),
            });
        }

        debug!(workers = count, "job pool started");

        Ok(Self {
            shared,
            workers: Mutex::new(workers),
        })
    }

    /// Submit a job for background execution.
    ///
    /// Returns `true` iff the job was enqueued; `false` once the pool is
    /// stopping or stopped. The queue is unbounded, so there is no other
    /// failure mode.
    pub fn submit<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit_inner(None, Box::new(job))
    }

    /// Submit a job with a diagnostic label.
    ///
    /// Identical to [`submit`](Self::submit) except that with the
    /// `telemetry` feature the job is stamped with an id and the label shows
    /// up in [`diagnostics`](Self::diagnostics). Without the feature the
    /// label is ignored.
    pub fn submit_labeled<F>(&self, label: &'static str, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit_inner(Some(label), Box::new(job))
    }

    fn submit_inner(&self, label: Option<&'static str>, run: Job) -> bool {
        // Fast path: cheap rejection without touching the lock.
        if !self.shared.accepting.load(Ordering::Acquire) {
            return false;
        }

        #[cfg(not(feature = "telemetry"))]
        let _ = label;

        let task = TaskItem {
            run,
            #[cfg(feature = "telemetry")]
            id: self.shared.next_task_id.fetch_add(1, Ordering::Relaxed),
            #[cfg(feature = "telemetry")]
            label,
        };

        {
            let mut queue = self.shared.queue.lock();

            // Re-check under the lock: a submission that raced past the fast
            // path must not enqueue after stop() cleared the queue.
            if !self.shared.accepting.load(Ordering::Relaxed) {
                return false;
            }

            queue.push_back(task);
            self.shared.submitted.fetch_add(1, Ordering::Relaxed);
        }

        self.shared.work_cv.notify_one();
        true
    }

    /// Block until the queue is empty and no job is in flight.
    ///
    /// New submissions may extend the busy period; this observes an
    /// instantaneous idle point. Calling from inside a job deadlocks.
    pub fn wait_idle(&self) {
        self.shared.wait_idle();
    }

    /// Shut the pool down.
    ///
    /// Idempotent and thread-safe: the first caller performs shutdown and
    /// blocks until the workers are joined; later callers return
    /// immediately. In-flight jobs always run to completion regardless of
    /// mode.
    pub fn stop(&self, mode: StopMode) {
        let latched = self
            .shared
            .accepting
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire);

        if latched.is_err() {
            // Already stopping or stopped.
            return;
        }

        debug!(?mode, "job pool stopping");

        {
            let mut queue = self.shared.queue.lock();

            if mode == StopMode::CancelPending {
                let discarded = queue.len();
                queue.clear();

                if discarded > 0 {
                    debug!(discarded, "discarded queued jobs");
                }
            }

            // Raised under the lock so a worker that just evaluated its wait
            // predicate cannot miss the wakeup.
            self.shared.stop.store(true, Ordering::Release);
        }

        self.shared.work_cv.notify_all();

        match mode {
            StopMode::Drain => self.shared.wait_idle(),
            StopMode::CancelPending => {
                let mut queue = self.shared.queue.lock();
                while self.shared.in_flight.load(Ordering::Acquire) != 0 {
                    self.shared.idle_cv.wait(&mut queue);
                }
            }
        }

        let mut workers = self.workers.lock();
        for handle in workers.iter_mut() {
            if let Some(thread) = handle.thread.take() {
                let _ = thread.join();
            }
        }
        workers.clear();

        debug!("job pool stopped");
    }

    /// Snapshot the pool's counters.
    pub fn stats(&self) -> Stats {
        let worker_count = self.workers.lock().len() as u32;
        let queued = self.shared.queue.lock().len() as u64;

        Stats {
            worker_count,
            queued,
            in_flight: self.shared.in_flight.load(Ordering::Acquire),
            submitted: self.shared.submitted.load(Ordering::Relaxed),
            completed: self.shared.completed.load(Ordering::Relaxed),
        }
    }

    /// Snapshot stats plus per-worker running-task state and the queued
    /// task ids/labels.
    ///
    /// Worker snapshots are lock-free reads; one may observe a job start
    /// without the matching finish.
    #[cfg(feature = "telemetry")]
    pub fn diagnostics(&self) -> Diagnostics {
        let stats = self.stats();

        let workers = {
            let handles = self.workers.lock();
            handles
                .iter()
                .filter_map(|handle| {
                    let thread = handle.thread.as_ref()?;
                    let (running, running_task_id, running_label) =
                        self.shared.slots[handle.index as usize].snapshot();

                    Some(WorkerDiagnostics {
                        index: handle.index,
                        os_thread_id: thread.thread().id(),
                        running,
                        running_task_id,
                        running_label,
                    })
                })
                .collect()
        };

        let queued = {
            let queue = self.shared.queue.lock();
            queue
                .iter()
                .map(|task| QueuedTaskInfo {
                    id: task.id,
                    label: task.label,
                })
                .collect()
        };

        Diagnostics {
            stats,
            workers,
            queued,
        }
    }
}

impl Drop for JobPool {
    fn drop(&mut self) {
        self.stop(StopMode::Drain);
    }
}

impl fmt::Debug for JobPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("JobPool")
            .field("worker_count", &stats.worker_count)
            .field("queued", &stats.queued)
            .field("in_flight", &stats.in_flight)
            .field("submitted", &stats.submitted)
            .field("completed", &stats.completed)
            .finish()
    }
}
