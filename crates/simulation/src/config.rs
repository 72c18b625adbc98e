//! Simulation parameters.

use core::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use stocksim_core::{DomainError, DomainResult};

/// Range the randomized initial stock is drawn from.
pub const INITIAL_STOCK_RANGE: RangeInclusive<i64> = 0..=100;
/// Range the randomized producer and consumer counts are drawn from.
pub const WORKER_RANGE: RangeInclusive<usize> = 1..=5;
/// Range the randomized per-worker operation count is drawn from.
pub const OPS_PER_WORKER_RANGE: RangeInclusive<u64> = 10..=200;

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Stock the counter starts with.
    pub initial_stock: i64,
    /// Number of delivery threads.
    pub producers: usize,
    /// Number of sale threads.
    pub consumers: usize,
    /// Operations each worker performs, producers and consumers alike.
    pub ops_per_worker: u64,
    /// Sample the stock from an observer thread while workers run.
    pub monitor: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_stock: 0,
            producers: 1,
            consumers: 1,
            ops_per_worker: 10,
            monitor: false,
        }
    }
}

impl SimulationConfig {
    /// Draw every parameter from its documented range.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            initial_stock: rng.gen_range(INITIAL_STOCK_RANGE),
            producers: rng.gen_range(WORKER_RANGE),
            consumers: rng.gen_range(WORKER_RANGE),
            ops_per_worker: rng.gen_range(OPS_PER_WORKER_RANGE),
            monitor: false,
        }
    }

    pub fn with_initial_stock(mut self, initial_stock: i64) -> Self {
        self.initial_stock = initial_stock;
        self
    }

    pub fn with_producers(mut self, producers: usize) -> Self {
        self.producers = producers;
        self
    }

    pub fn with_consumers(mut self, consumers: usize) -> Self {
        self.consumers = consumers;
        self
    }

    pub fn with_ops_per_worker(mut self, ops: u64) -> Self {
        self.ops_per_worker = ops;
        self
    }

    pub fn with_monitor(mut self, monitor: bool) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.initial_stock < 0 {
            return Err(DomainError::validation("initial stock cannot be negative"));
        }
        Ok(())
    }

    /// Deliveries a run with this configuration always ends with.
    pub fn total_delivery_attempts(&self) -> u64 {
        self.producers as u64 * self.ops_per_worker
    }

    /// Upper bound on sales: every consumer call succeeding.
    pub fn total_sale_attempts(&self) -> u64 {
        self.consumers as u64 * self.ops_per_worker
    }
}
