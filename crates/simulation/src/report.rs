//! Outcome of a finished run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use stocksim_inventory::StockSnapshot;

use crate::config::SimulationConfig;
use crate::monitor::MonitorSummary;
use crate::worker::{WorkerRole, WorkerStats};

/// Totals read back after every worker has been joined.
///
/// `Display` renders the five-line summary printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub config: SimulationConfig,
    pub snapshot: StockSnapshot,
    pub workers: Vec<WorkerStats>,
    pub monitor: Option<MonitorSummary>,
    pub elapsed: Duration,
}

impl SimulationReport {
    pub fn initial_stock(&self) -> i64 {
        self.config.initial_stock
    }

    pub fn deliveries(&self) -> u64 {
        self.snapshot.deliveries
    }

    pub fn sales(&self) -> u64 {
        self.snapshot.sales
    }

    pub fn final_stock(&self) -> i64 {
        self.snapshot.stock
    }

    /// Right-hand side of the check line: `initial + deliveries - sales`.
    pub fn checked_stock(&self) -> i64 {
        self.snapshot.expected_stock(self.initial_stock())
    }

    pub fn is_conserved(&self) -> bool {
        self.snapshot.is_conserved(self.initial_stock())
    }

    /// Sale attempts that found the stock empty.
    pub fn missed_sales(&self) -> u64 {
        self.config.total_sale_attempts().saturating_sub(self.sales())
    }

    /// Compare-and-set races lost across all workers of `role`.
    pub fn retries(&self, role: WorkerRole) -> u64 {
        self.workers
            .iter()
            .filter(|w| w.role == role)
            .map(|w| w.retries)
            .sum()
    }
}

impl core::fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Inventario inicial: {}", self.initial_stock())?;
        writeln!(f, "Total de entregas realizadas: {}", self.deliveries())?;
        writeln!(f, "Total de ventas realizadas: {}", self.sales())?;
        writeln!(f, "Inventario final: {}", self.final_stock())?;
        write!(
            f,
            "Comprobación: {} + {} - {} = {}",
            self.initial_stock(),
            self.deliveries(),
            self.sales(),
            self.checked_stock()
        )
    }
}
