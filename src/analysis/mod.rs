//! Analysis modules.
//!
//! Ranking aggregation and evaluation progress over a photo snapshot.

pub mod aggregator;
pub mod progress;

pub use aggregator::*;
pub use progress::*;
