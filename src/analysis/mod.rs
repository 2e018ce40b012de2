//! Analysis modules.
//!
//! Summary statistics and grouped revenue over a loaded transaction table.

pub mod aggregator;

pub use aggregator::*;
