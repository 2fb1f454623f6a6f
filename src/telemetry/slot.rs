//! Per-worker running-task snapshot slots.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// What one worker is doing right now, published for observers.
///
/// Writers are the owning worker only; readers are diagnostics snapshots.
/// The fields are not updated atomically as a group, so a reader may see a
/// task start without the matching finish. The label is a fat pointer and
/// lives behind a lock of its own; it is written before `running` flips on
/// and cleared after it flips off.
pub(crate) struct WorkerSlot {
    running: AtomicBool,
    task_id: AtomicU64,
    label: RwLock<Option<&'static str>>,
}

impl WorkerSlot {
    pub(crate) fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            task_id: AtomicU64::new(0),
            label: RwLock::new(None),
        }
    }

    pub(crate) fn task_started(&self, id: u64, label: Option<&'static str>) {
        *self.label.write() = label;
        self.task_id.store(id, Ordering::Release);
        self.running.store(true, Ordering::Release);
    }

    pub(crate) fn task_finished(&self) {
        self.running.store(false, Ordering::Release);
        self.task_id.store(0, Ordering::Release);
        *self.label.write() = None;
    }

    /// (running, task id, label) as independently loaded values.
    pub(crate) fn snapshot(&self) -> (bool, u64, Option<&'static str>) {
        (
            self.running.load(Ordering::Acquire),
            self.task_id.load(Ordering::Acquire),
            *self.label.read(),
        )
    }
}

impl Default for WorkerSlot {
    fn default() -> Self {
        Self::new()
    }
}
