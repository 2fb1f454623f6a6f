//! Read-only diagnostic snapshots.

use crate::executor::Stats;
use std::thread::ThreadId;

/// Full diagnostic snapshot: counters, per-worker state, queued tasks.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    /// Counter snapshot, as returned by [`JobPool::stats`](crate::JobPool::stats).
    pub stats: Stats,
    /// One entry per live worker.
    pub workers: Vec<WorkerDiagnostics>,
    /// Ids and labels of tasks waiting in the queue, FIFO order.
    pub queued: Vec<QueuedTaskInfo>,
}

/// One worker's state at snapshot time.
///
/// The fields are independent loads; `running_task_id`/`running_label` may
/// lag or lead `running` by one task.
#[derive(Debug, Clone)]
pub struct WorkerDiagnostics {
    /// Worker index, 0-based.
    pub index: u32,
    /// The worker's OS thread id.
    pub os_thread_id: ThreadId,
    /// Whether a job was executing at snapshot time.
    pub running: bool,
    /// Id of the executing job, 0 when idle.
    pub running_task_id: u64,
    /// Label of the executing job, if it was submitted with one.
    pub running_label: Option<&'static str>,
}

/// A task still waiting in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedTaskInfo {
    /// The task's id.
    pub id: u64,
    /// The task's label, if any.
    pub label: Option<&'static str>,
}
