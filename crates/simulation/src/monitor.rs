//! Observer thread sampling the stock while workers run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::debug;

use stocksim_inventory::BoundedCounter;

/// Extremes of the stock seen by the monitor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorSummary {
    pub min_stock: i64,
    pub max_stock: i64,
    pub samples: u64,
}

impl MonitorSummary {
    fn starting_at(stock: i64) -> Self {
        Self {
            min_stock: stock,
            max_stock: stock,
            samples: 1,
        }
    }

    fn record(&mut self, stock: i64) {
        self.min_stock = self.min_stock.min(stock);
        self.max_stock = self.max_stock.max(stock);
        self.samples += 1;
    }
}

/// Sample `counter` until `done` is set, then take one last sample.
pub fn watch(counter: &BoundedCounter, done: &AtomicBool) -> MonitorSummary {
    let mut summary = MonitorSummary::starting_at(counter.stock());

    while !done.load(Ordering::Acquire) {
        summary.record(counter.stock());
        thread::yield_now();
    }
    summary.record(counter.stock());

    debug!(
        samples = summary.samples,
        min_stock = summary.min_stock,
        max_stock = summary.max_stock,
        "monitor stopped"
    );
    summary
}
