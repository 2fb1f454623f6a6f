//! Queued work item representation.

/// Boxed unit of work handed to a worker.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// A queued task: the job plus, under telemetry, its id and label.
///
/// Ids are assigned per pool, start at 1 and never repeat within a pool's
/// lifetime. 0 is reserved to mean "no task".
pub(crate) struct TaskItem {
    pub(crate) run: Job,

    #[cfg(feature = "telemetry")]
    pub(crate) id: u64,
    #[cfg(feature = "telemetry")]
    pub(crate) label: Option<&'static str>,
}

impl std::fmt::Debug for TaskItem {
    #[cfg(feature = "telemetry")]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskItem")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }

    #[cfg(not(feature = "telemetry"))]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskItem").finish_non_exhaustive()
    }
}
