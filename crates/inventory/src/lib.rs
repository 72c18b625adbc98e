//! Inventory domain module (lock-free).
//!
//! This crate holds the shared stock counter mutated concurrently by
//! delivery and sale workers, and the snapshot value read back after a run.
//! No threads are spawned here; see `stocksim-simulation` for the driver.

pub mod counter;
pub mod snapshot;

mod sync;

pub use counter::{BoundedCounter, CasOutcome};
pub use snapshot::StockSnapshot;
