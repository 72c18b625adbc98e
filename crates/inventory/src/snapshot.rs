use serde::{Deserialize, Serialize};

use stocksim_core::ValueObject;

/// Point-in-time reading of a [`BoundedCounter`](crate::BoundedCounter).
///
/// Each field is read independently, so a snapshot taken while workers are
/// still running is not guaranteed to satisfy conservation. Once every
/// worker has been joined it is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub stock: i64,
    pub deliveries: u64,
    pub sales: u64,
}

impl ValueObject for StockSnapshot {}

impl StockSnapshot {
    /// `initial + deliveries - sales`: the stock a correct counter must hold.
    pub fn expected_stock(&self, initial_stock: i64) -> i64 {
        initial_stock + self.deliveries as i64 - self.sales as i64
    }

    pub fn is_conserved(&self, initial_stock: i64) -> bool {
        self.stock == self.expected_stock(initial_stock)
    }
}
