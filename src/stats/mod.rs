//! Statistics providers.
//!
//! Two interchangeable sources of raw per-language records: a remote
//! counting API and a local `scc` invocation. Both return [`RawStats`]
//! sequences for the aggregator.
//!
//! [`RawStats`]: crate::models::RawStats

pub mod countloc;
pub mod scc;

pub use countloc::CountlocClient;
pub use scc::SccRunner;
