use std::io;

use thiserror::Error;

use stocksim_core::DomainError;

/// Errors that abort a simulation run.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] DomainError),

    #[error("failed to spawn {worker}: {source}")]
    Spawn {
        worker: String,
        #[source]
        source: io::Error,
    },

    #[error("{worker} panicked")]
    WorkerPanicked { worker: String },

    /// The joined counter broke `stock == initial + deliveries - sales` or went negative.
    #[error("stock not conserved: expected {expected}, found {actual}")]
    ConservationViolated { expected: i64, actual: i64 },
}
