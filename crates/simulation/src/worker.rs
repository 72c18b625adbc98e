//! Worker loops: one per thread, a fixed number of counter calls each.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use stocksim_inventory::BoundedCounter;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerRole {
    /// Calls `increment` (a delivery).
    Producer,
    /// Calls `try_decrement` (a sale attempt).
    Consumer,
}

impl core::fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WorkerRole::Producer => f.write_str("producer"),
            WorkerRole::Consumer => f.write_str("consumer"),
        }
    }
}

/// What one worker achieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStats {
    pub role: WorkerRole,
    pub index: usize,
    /// Calls made.
    pub attempts: u64,
    /// Calls that changed the stock (always `attempts` for producers).
    pub committed: u64,
    /// Compare-and-set races lost along the way.
    pub retries: u64,
}

impl WorkerStats {
    pub fn thread_name(&self) -> String {
        thread_name(self.role, self.index)
    }
}

pub(crate) fn thread_name(role: WorkerRole, index: usize) -> String {
    format!("{role}-{index}")
}

/// Run `ops` counter calls for `role` on the current thread.
pub fn run(role: WorkerRole, index: usize, counter: &BoundedCounter, ops: u64) -> WorkerStats {
    let mut stats = WorkerStats {
        role,
        index,
        attempts: 0,
        committed: 0,
        retries: 0,
    };

    for _ in 0..ops {
        let outcome = match role {
            WorkerRole::Producer => counter.increment_counted(),
            WorkerRole::Consumer => counter.try_decrement_counted(),
        };
        stats.attempts += 1;
        stats.retries += outcome.retries;
        if outcome.committed {
            stats.committed += 1;
        }
        if outcome.retries > 0 {
            trace!(retries = outcome.retries, "lost compare-and-set race");
        }
    }

    debug!(
        role = %role,
        index,
        committed = stats.committed,
        retries = stats.retries,
        "worker finished"
    );
    stats
}
