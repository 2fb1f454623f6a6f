//! jobpool - a fixed-size worker pool job scheduler.
//!
//! A shared FIFO queue feeds N worker threads; callers submit opaque,
//! fire-and-forget closures from any thread, observe progress through
//! counters, and shut the pool down deterministically in one of two modes.
//!
//! # Quick Start
//!
//! ```no_run
//! use jobpool::{Config, JobPool, StopMode};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let pool = JobPool::new(Config::default()).unwrap();
//! let counter = Arc::new(AtomicUsize::new(0));
//!
//! for _ in 0..100 {
//!     let counter = counter.clone();
//!     pool.submit(move || {
//!         counter.fetch_add(1, Ordering::Relaxed);
//!     });
//! }
//!
//! pool.wait_idle();
//! assert_eq!(counter.load(Ordering::Relaxed), 100);
//!
//! pool.stop(StopMode::Drain);
//! ```
//!
//! # Features
//!
//! - **FIFO dispatch**: jobs run in submission order across a fixed worker set
//! - **Two-mode shutdown**: drain everything, or cancel pending and finish in-flight
//! - **Observable progress**: submitted/completed/in-flight/queued counters
//! - **Panic containment**: a panicking job never takes its worker down
//! - **Telemetry** (optional): task ids and labels, per-worker running-task
//!   snapshots, JSON/console export
//!
//! Dropping a [`JobPool`] drains it: a submitted job that never returns will
//! block drop forever.

// Lint configuration
#![warn(missing_docs, missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod telemetry;
pub mod util;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use executor::{JobPool, Stats, StopMode};

#[cfg(feature = "telemetry")]
pub use telemetry::{
    ConsoleExporter, Diagnostics, DiagnosticsExporter, JsonExporter, QueuedTaskInfo,
    WorkerDiagnostics,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_basic_submit() {
        let pool = JobPool::new(Config::default()).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..50 {
            let counter = counter.clone();
            assert!(pool.submit(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            }));
        }

        pool.wait_idle();
        assert_eq!(counter.load(Ordering::Relaxed), 50);

        pool.stop(StopMode::Drain);
    }

    #[test]
    fn test_stats_shape() {
        let pool = JobPool::new(Config::builder().worker_threads(2).build().unwrap()).unwrap();

        pool.submit(|| {});
        pool.wait_idle();

        let stats = pool.stats();
        assert_eq!(stats.worker_count, 2);
        assert_eq!(stats.submitted, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.queued, 0);
        assert_eq!(stats.in_flight, 0);
    }
}
