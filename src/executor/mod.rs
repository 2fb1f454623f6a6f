//! The scheduler core.
//!
//! This module provides the job pool itself: the shared FIFO queue, the
//! worker loop, and the drain/cancel shutdown protocol.

pub mod pool;
pub(crate) mod queue;
pub(crate) mod task;
pub(crate) mod worker;

pub use pool::{JobPool, Stats, StopMode};
