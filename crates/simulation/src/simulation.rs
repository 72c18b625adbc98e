//! Run driver: spawn, join, read back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::Instant;

use tracing::{error, info};

use stocksim_inventory::{BoundedCounter, StockSnapshot};

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::monitor::{self, MonitorSummary};
use crate::report::SimulationReport;
use crate::worker::{self, WorkerRole, WorkerStats};

const MONITOR_THREAD: &str = "stock-monitor";

type Joined = (Vec<WorkerStats>, Option<MonitorSummary>);

/// A validated, runnable configuration.
///
/// Each call to [`run`](Simulation::run) starts from a fresh counter, so the
/// same simulation can be run repeatedly.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Spawn every worker, wait for all of them, then read the counter.
    ///
    /// Producers are spawned before consumers. Nothing is read from the
    /// counter until every worker has been joined.
    pub fn run(&self) -> Result<SimulationReport, SimulationError> {
        let config = &self.config;
        let counter = BoundedCounter::new(config.initial_stock)?;
        let done = AtomicBool::new(false);

        info!(
            initial_stock = config.initial_stock,
            producers = config.producers,
            consumers = config.consumers,
            ops_per_worker = config.ops_per_worker,
            monitor = config.monitor,
            "starting simulation"
        );
        let started = Instant::now();

        let (workers, monitor) = thread::scope(|s| -> Result<Joined, SimulationError> {
            let monitor = if config.monitor {
                Some(spawn_named(s, MONITOR_THREAD.to_string(), || {
                    monitor::watch(&counter, &done)
                })?)
            } else {
                None
            };

            let mut handles = Vec::with_capacity(config.producers + config.consumers);
            let spawned = worker_plan(config).try_for_each(|(role, index)| {
                let name = worker::thread_name(role, index);
                let counter = &counter;
                let ops = config.ops_per_worker;
                handles.push(spawn_named(s, name, move || {
                    worker::run(role, index, counter, ops)
                })?);
                Ok::<_, SimulationError>(())
            });

            // Join whatever was spawned before reporting a spawn failure, and
            // stop the monitor either way so the scope can close.
            let joined: Vec<_> = handles.into_iter().map(join_named).collect();
            done.store(true, Ordering::Release);
            let monitor = monitor.map(join_named).transpose();

            spawned?;
            let workers = joined.into_iter().collect::<Result<Vec<_>, _>>()?;
            Ok((workers, monitor?))
        })?;

        let elapsed = started.elapsed();
        let snapshot = counter.snapshot();
        verify(config, &snapshot)?;

        let report = SimulationReport {
            config: config.clone(),
            snapshot,
            workers,
            monitor,
            elapsed,
        };
        info!(
            deliveries = report.deliveries(),
            sales = report.sales(),
            missed_sales = report.missed_sales(),
            final_stock = report.final_stock(),
            producer_retries = report.retries(WorkerRole::Producer),
            consumer_retries = report.retries(WorkerRole::Consumer),
            elapsed_ms = elapsed.as_millis() as u64,
            "simulation finished"
        );
        Ok(report)
    }
}

fn worker_plan(config: &SimulationConfig) -> impl Iterator<Item = (WorkerRole, usize)> {
    let producers = (0..config.producers).map(|i| (WorkerRole::Producer, i));
    let consumers = (0..config.consumers).map(|i| (WorkerRole::Consumer, i));
    producers.chain(consumers)
}

struct NamedHandle<'scope, T> {
    name: String,
    handle: ScopedJoinHandle<'scope, T>,
}

fn spawn_named<'scope, 'env, T, F>(
    scope: &'scope Scope<'scope, 'env>,
    name: String,
    f: F,
) -> Result<NamedHandle<'scope, T>, SimulationError>
where
    F: FnOnce() -> T + Send + 'scope,
    T: Send + 'scope,
{
    match thread::Builder::new().name(name.clone()).spawn_scoped(scope, f) {
        Ok(handle) => Ok(NamedHandle { name, handle }),
        Err(source) => {
            error!(worker = %name, error = %source, "failed to spawn thread");
            Err(SimulationError::Spawn {
                worker: name,
                source,
            })
        }
    }
}

fn join_named<T>(named: NamedHandle<'_, T>) -> Result<T, SimulationError> {
    named.handle.join().map_err(|_| {
        error!(worker = %named.name, "thread panicked");
        SimulationError::WorkerPanicked { worker: named.name }
    })
}

fn verify(config: &SimulationConfig, snapshot: &StockSnapshot) -> Result<(), SimulationError> {
    let expected = snapshot.expected_stock(config.initial_stock);
    if snapshot.stock < 0 || snapshot.stock != expected {
        error!(
            expected,
            actual = snapshot.stock,
            deliveries = snapshot.deliveries,
            sales = snapshot.sales,
            "stock not conserved"
        );
        return Err(SimulationError::ConservationViolated {
            expected,
            actual: snapshot.stock,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stocksim_core::DomainError;

    fn run(config: SimulationConfig) -> SimulationReport {
        Simulation::new(config).unwrap().run().unwrap()
    }

    #[test]
    fn rejects_negative_initial_stock() {
        let err = Simulation::new(SimulationConfig::default().with_initial_stock(-1)).unwrap_err();
        match err {
            SimulationError::InvalidConfig(DomainError::Validation(_)) => {}
            other => panic!("Expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn single_pair_from_empty_stock() {
        let report = run(SimulationConfig::default()
            .with_initial_stock(0)
            .with_producers(1)
            .with_consumers(1)
            .with_ops_per_worker(10));

        assert_eq!(report.deliveries(), 10);
        assert!((0..=10).contains(&report.final_stock()));
        assert_eq!(report.sales() as i64, 10 - report.final_stock());
        assert_eq!(report.workers.len(), 2);
    }

    #[test]
    fn zero_operations_leave_stock_untouched() {
        let report = run(SimulationConfig::default()
            .with_initial_stock(50)
            .with_ops_per_worker(0));

        assert_eq!(report.deliveries(), 0);
        assert_eq!(report.sales(), 0);
        assert_eq!(report.final_stock(), 50);
        assert!(report.to_string().ends_with("Comprobación: 50 + 0 - 0 = 50"));
    }

    #[test]
    fn consumers_only_sell_initial_stock() {
        let report = run(SimulationConfig::default()
            .with_initial_stock(30)
            .with_producers(0)
            .with_consumers(4)
            .with_ops_per_worker(20));

        assert_eq!(report.sales(), 30);
        assert_eq!(report.final_stock(), 0);
        assert_eq!(report.missed_sales(), 50);
    }

    #[test]
    fn stress_never_observes_negative_stock() {
        let report = run(SimulationConfig::default()
            .with_initial_stock(0)
            .with_producers(5)
            .with_consumers(5)
            .with_ops_per_worker(200)
            .with_monitor(true));

        assert_eq!(report.deliveries(), 1000);
        assert_eq!(report.final_stock() + report.sales() as i64, 1000);

        let monitor = report.monitor.expect("monitor enabled");
        assert!(monitor.min_stock >= 0);
        assert!(monitor.max_stock <= 1000);
        assert!(monitor.samples >= 2);
    }

    #[test]
    fn reruns_deliver_the_same_totals() {
        let simulation = Simulation::new(
            SimulationConfig::default()
                .with_initial_stock(20)
                .with_producers(3)
                .with_consumers(4)
                .with_ops_per_worker(150),
        )
        .unwrap();

        let first = simulation.run().unwrap();
        let second = simulation.run().unwrap();

        assert_eq!(first.deliveries(), 450);
        assert_eq!(second.deliveries(), 450);
        assert!(first.is_conserved());
        assert!(second.is_conserved());
    }

    #[test]
    fn worker_stats_match_totals() {
        let report = run(SimulationConfig::default()
            .with_initial_stock(5)
            .with_producers(2)
            .with_consumers(3)
            .with_ops_per_worker(40));

        let committed = |role: WorkerRole| -> u64 {
            report
                .workers
                .iter()
                .filter(|w| w.role == role)
                .map(|w| w.committed)
                .sum()
        };
        assert_eq!(committed(WorkerRole::Producer), report.deliveries());
        assert_eq!(committed(WorkerRole::Consumer), report.sales());
        assert!(report.workers.iter().all(|w| w.attempts == 40));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 32,
                ..ProptestConfig::default()
            })]

            /// Property: every run conserves stock and respects the sale bounds.
            #[test]
            fn runs_conserve_stock(
                initial in 0i64..=100,
                producers in 0usize..=5,
                consumers in 0usize..=5,
                ops in 0u64..=200
            ) {
                let config = SimulationConfig::default()
                    .with_initial_stock(initial)
                    .with_producers(producers)
                    .with_consumers(consumers)
                    .with_ops_per_worker(ops);
                let report = Simulation::new(config.clone()).unwrap().run().unwrap();

                prop_assert!(report.final_stock() >= 0);
                prop_assert!(report.is_conserved());
                prop_assert_eq!(report.deliveries(), config.total_delivery_attempts());
                prop_assert!(report.sales() <= config.total_sale_attempts());
                prop_assert!(report.sales() as i64 <= initial + report.deliveries() as i64);
            }
        }
    }
}
