// worker thread loop
use super::queue::Shared;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{trace, warn};

pub(crate) struct Worker {
    pub(crate) index: u32,
    pub(crate) shared: Arc<Shared>,
}

impl Worker {
    // Pop-execute-notify cycle. Exits only when stop is requested and the
    // queue has nothing left; a stop-requested worker keeps draining.
    pub(crate) fn run(self) {
        trace!(worker = self.index, "worker started");

        loop {
            let task = {
                let mut queue = self.shared.queue.lock();

                while queue.is_empty() && !self.shared.stop.load(Ordering::Acquire) {
                    self.shared.work_cv.wait(&mut queue);
                }

                match queue.pop_front() {
                    Some(task) => {
                        self.shared.in_flight.fetch_add(1, Ordering::AcqRel);
                        task
                    }
                    // Stop requested and the queue is drained (or cleared).
                    None => break,
                }
            };

            #[cfg(feature = "telemetry")]
            let slot = &self.shared.slots[self.index as usize];
            #[cfg(feature = "telemetry")]
            slot.task_started(task.id, task.label);

            // The job runs outside the lock, so long jobs never serialize
            // submissions. A panic is contained here; the worker must not die.
            if let Err(payload) = catch_unwind(AssertUnwindSafe(task.run)) {
                warn!(
                    worker = self.index,
                    "job panicked: {}",
                    payload_message(payload.as_ref())
                );
            }

            #[cfg(feature = "telemetry")]
            slot.task_finished();

            {
                let _queue = self.shared.queue.lock();
                self.shared.in_flight.fetch_sub(1, Ordering::AcqRel);
                // Counted only now that the job has returned: while it ran,
                // the task was visible as in-flight, not completed.
                self.shared.completed.fetch_add(1, Ordering::Relaxed);
                self.shared.idle_cv.notify_all();
            }
        }

        // Give idle waiters one last chance to re-check their predicates.
        {
            let _queue = self.shared.queue.lock();
            self.shared.idle_cv.notify_all();
        }

        trace!(worker = self.index, "worker exited");
    }
}

fn payload_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
