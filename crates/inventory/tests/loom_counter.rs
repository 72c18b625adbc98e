//! Loom model checks for the counter's compare-and-set loop.
//!
//! Run with: RUSTFLAGS="--cfg loom" cargo test -p stocksim-inventory --test loom_counter --release
//!
//! Under a normal `cargo test` this file compiles to an empty module.

#![cfg(loom)]

use loom::sync::Arc;
use loom::thread;

use stocksim_inventory::BoundedCounter;

#[test]
fn loom_two_consumers_race_for_last_unit() {
    loom::model(|| {
        let counter = Arc::new(BoundedCounter::new(1).unwrap());

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || counter.try_decrement())
            })
            .collect();

        let sold: usize = handles
            .into_iter()
            .map(|h| usize::from(h.join().unwrap()))
            .sum();

        assert_eq!(sold, 1);
        assert_eq!(counter.stock(), 0);
        assert_eq!(counter.sales(), 1);
    });
}

#[test]
fn loom_producer_and_consumer_conserve_stock() {
    loom::model(|| {
        let counter = Arc::new(BoundedCounter::new(0).unwrap());

        let producer = {
            let counter = counter.clone();
            thread::spawn(move || counter.increment())
        };
        let consumer = {
            let counter = counter.clone();
            thread::spawn(move || counter.try_decrement())
        };

        producer.join().unwrap();
        let sold = consumer.join().unwrap();

        let snapshot = counter.snapshot();
        assert_eq!(snapshot.deliveries, 1);
        assert_eq!(snapshot.sales, u64::from(sold));
        assert!(snapshot.stock >= 0);
        assert!(snapshot.is_conserved(0));
    });
}
