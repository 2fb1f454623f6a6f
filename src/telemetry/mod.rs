//! Telemetry and diagnostics subsystem.
//!
//! A thin, read-only projection of pool state: per-task ids and labels,
//! per-worker running-task snapshots, and export helpers. Everything here
//! is behind the `telemetry` cargo feature; when disabled, no id is
//! assigned and submission labels are dropped.

#[cfg(feature = "telemetry")]
pub mod diagnostics;

#[cfg(feature = "telemetry")]
pub mod export;

#[cfg(feature = "telemetry")]
pub(crate) mod slot;

#[cfg(feature = "telemetry")]
pub use diagnostics::{Diagnostics, QueuedTaskInfo, WorkerDiagnostics};

#[cfg(feature = "telemetry")]
pub use export::{ConsoleExporter, DiagnosticsExporter, JsonExporter};
