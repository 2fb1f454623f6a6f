//! Diagnostics export in various formats.

use super::diagnostics::Diagnostics;
use crate::error::{Error, Result};

/// Trait for exporting a diagnostics snapshot.
pub trait DiagnosticsExporter: Send + Sync {
    /// Export one snapshot.
    fn export(&self, diagnostics: &Diagnostics) -> Result<()>;
}

/// Export diagnostics as pretty-printed JSON to a file.
pub struct JsonExporter {
    output_path: std::path::PathBuf,
}

impl JsonExporter {
    /// Create an exporter writing to the given path.
    pub fn new(output_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }
}

impl DiagnosticsExporter for JsonExporter {
    fn export(&self, diagnostics: &Diagnostics) -> Result<()> {
        let serializable = SerializableDiagnostics::from(diagnostics);
        let json = serde_json::to_string_pretty(&serializable)
            .map_err(|e| Error::export(format!("JSON serialization failed: {e}")))?;

        std::fs::write(&self.output_path, json)?;

        Ok(())
    }
}

/// Serializable mirror of [`Diagnostics`].
#[derive(Debug, Clone, serde::Serialize)]
struct SerializableDiagnostics {
    worker_count: u32,
    queued: u64,
    in_flight: u64,
    submitted: u64,
    completed: u64,
    workers: Vec<SerializableWorker>,
    queued_tasks: Vec<SerializableQueuedTask>,
}

#[derive(Debug, Clone, serde::Serialize)]
struct SerializableWorker {
    index: u32,
    os_thread_id: String,
    running: bool,
    running_task_id: u64,
    running_label: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
struct SerializableQueuedTask {
    id: u64,
    label: Option<String>,
}

impl From<&Diagnostics> for SerializableDiagnostics {
    fn from(diagnostics: &Diagnostics) -> Self {
        Self {
            worker_count: diagnostics.stats.worker_count,
            queued: diagnostics.stats.queued,
            in_flight: diagnostics.stats.in_flight,
            submitted: diagnostics.stats.submitted,
            completed: diagnostics.stats.completed,
            workers: diagnostics
                .workers
                .iter()
                .map(|w| SerializableWorker {
                    index: w.index,
                    os_thread_id: format!("{:?}", w.os_thread_id),
                    running: w.running,
                    running_task_id: w.running_task_id,
                    running_label: w.running_label.map(str::to_owned),
                })
                .collect(),
            queued_tasks: diagnostics
                .queued
                .iter()
                .map(|t| SerializableQueuedTask {
                    id: t.id,
                    label: t.label.map(str::to_owned),
                })
                .collect(),
        }
    }
}

/// Export diagnostics to stdout in a human-readable form.
pub struct ConsoleExporter {
    verbose: bool,
}

impl ConsoleExporter {
    /// Create a console exporter. `verbose` adds per-worker and queue lines.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl DiagnosticsExporter for ConsoleExporter {
    fn export(&self, diagnostics: &Diagnostics) -> Result<()> {
        let stats = &diagnostics.stats;

        println!("=== JobPool Diagnostics ===");
        println!("Workers: {}", stats.worker_count);
        println!("Queued: {}", stats.queued);
        println!("In flight: {}", stats.in_flight);
        println!("Submitted: {}", stats.submitted);
        println!("Completed: {}", stats.completed);

        if self.verbose {
            for worker in &diagnostics.workers {
                if worker.running {
                    println!(
                        "  worker {} [{:?}]: running task {} ({})",
                        worker.index,
                        worker.os_thread_id,
                        worker.running_task_id,
                        worker.running_label.unwrap_or("unlabeled"),
                    );
                } else {
                    println!("  worker {} [{:?}]: idle", worker.index, worker.os_thread_id);
                }
            }

            for task in &diagnostics.queued {
                println!(
                    "  queued task {} ({})",
                    task.id,
                    task.label.unwrap_or("unlabeled")
                );
            }
        }

        println!("===========================");

        Ok(())
    }
}

impl Default for ConsoleExporter {
    fn default() -> Self {
        Self::new(false)
    }
}
