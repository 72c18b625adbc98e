//! Lock-free stock counter.
//!
//! `stock` is mutated only through a compare-and-set retry loop; `deliveries`
//! and `sales` are independent monotonic tallies bumped after a successful
//! commit. There is no cross-field atomicity: the three cells are only
//! guaranteed to agree once every mutating thread has been joined.

use stocksim_core::{DomainError, DomainResult};

use crate::snapshot::StockSnapshot;
use crate::sync::{AtomicI64, AtomicU64, Ordering};

/// Result of one mutating call, with the number of lost compare-and-set races.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CasOutcome {
    /// Whether the operation changed the stock.
    pub committed: bool,
    /// Compare-and-set attempts that failed before the loop returned.
    pub retries: u64,
}

/// Shared inventory counter: unconditional deliveries, sales only while stock lasts.
pub struct BoundedCounter {
    stock: AtomicI64,
    deliveries: AtomicU64,
    sales: AtomicU64,
}

impl BoundedCounter {
    /// Create a counter holding `initial_stock` units.
    pub fn new(initial_stock: i64) -> DomainResult<Self> {
        if initial_stock < 0 {
            return Err(DomainError::validation(format!(
                "initial stock cannot be negative (got {initial_stock})"
            )));
        }
        Ok(Self {
            stock: AtomicI64::new(initial_stock),
            deliveries: AtomicU64::new(0),
            sales: AtomicU64::new(0),
        })
    }

    /// Record one delivery. Always succeeds.
    pub fn increment(&self) {
        self.increment_counted();
    }

    /// Same as [`increment`](Self::increment), reporting contention.
    pub fn increment_counted(&self) -> CasOutcome {
        let outcome = self.update_stock(|current| Some(current + 1));
        self.deliveries.fetch_add(1, Ordering::Relaxed);
        outcome
    }

    /// Sell one unit if any is in stock.
    ///
    /// Returns `false` without touching any counter when the stock is
    /// exhausted. Consumers never wait for supply.
    pub fn try_decrement(&self) -> bool {
        self.try_decrement_counted().committed
    }

    /// Same as [`try_decrement`](Self::try_decrement), reporting contention.
    pub fn try_decrement_counted(&self) -> CasOutcome {
        // The positivity check runs against every freshly observed value.
        let outcome = self.update_stock(|current| (current > 0).then(|| current - 1));
        if outcome.committed {
            self.sales.fetch_add(1, Ordering::Relaxed);
        }
        outcome
    }

    pub fn stock(&self) -> i64 {
        self.stock.load(Ordering::SeqCst)
    }

    pub fn deliveries(&self) -> u64 {
        self.deliveries.load(Ordering::Relaxed)
    }

    pub fn sales(&self) -> u64 {
        self.sales.load(Ordering::Relaxed)
    }

    /// Read all three cells. Each one is read independently.
    pub fn snapshot(&self) -> StockSnapshot {
        StockSnapshot {
            stock: self.stock(),
            deliveries: self.deliveries(),
            sales: self.sales(),
        }
    }

    /// Read, compute, compare-and-set; on a lost race start over from the
    /// value that won. `next` returning `None` abandons the update.
    fn update_stock<F>(&self, next: F) -> CasOutcome
    where
        F: Fn(i64) -> Option<i64>,
    {
        let mut retries = 0;
        let mut current = self.stock.load(Ordering::SeqCst);
        loop {
            let Some(candidate) = next(current) else {
                return CasOutcome {
                    committed: false,
                    retries,
                };
            };
            match self.stock.compare_exchange_weak(
                current,
                candidate,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => {
                    return CasOutcome {
                        committed: true,
                        retries,
                    };
                }
                Err(observed) => {
                    current = observed;
                    retries += 1;
                }
            }
        }
    }
}

impl core::fmt::Debug for BoundedCounter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("BoundedCounter")
            .field("stock", &snapshot.stock)
            .field("deliveries", &snapshot.deliveries)
            .field("sales", &snapshot.sales)
            .finish()
    }
}
