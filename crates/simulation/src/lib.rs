//! Producer/consumer driver for the shared stock counter.
//!
//! A run spawns one OS thread per worker (scoped, named `producer-N` /
//! `consumer-N`), blocks until every worker has been joined, then reads the
//! counter back into a [`SimulationReport`].

pub mod config;
pub mod error;
pub mod monitor;
pub mod report;
pub mod simulation;
pub mod worker;

pub use config::SimulationConfig;
pub use error::SimulationError;
pub use monitor::MonitorSummary;
pub use report::SimulationReport;
pub use simulation::Simulation;
pub use worker::{WorkerRole, WorkerStats};
