//! Statistics aggregation.
//!
//! The aggregator is the only computation this crate performs itself;
//! everything it consumes comes from the metadata and statistics providers.

pub mod aggregator;

pub use aggregator::*;
