//! Small internal utilities.

pub mod cache_padded;

pub use cache_padded::CachePadded;
