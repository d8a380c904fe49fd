//! Concurrency test
//!
//! Verifies that many independent generation paths sharing one factory
//! never observe the same order id, and that the concurrent runner merges
//! worker output deterministically.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use stress_test::errors::WorkerError;
use stress_test::factory::{rng_for, OrderFactory};
use stress_test::runner::{generate_worker_orders, ConcurrentRunner};

#[test]
fn test_shared_factory_ids_distinct() {
    let factory = Arc::new(OrderFactory::default());
    let num_threads = 16;
    let per_thread = 2_000;

    let handles: Vec<_> = (0..num_threads)
        .map(|stream| {
            let factory = Arc::clone(&factory);
            thread::spawn(move || {
                let mut rng = rng_for(Some(1), stream);
                let mut ids = Vec::with_capacity(per_thread);
                for _ in 0..per_thread {
                    ids.push(factory.generate(&mut rng).order_id.value());
                }
                ids
            })
        })
        .collect();

    let mut all_ids = HashSet::new();
    for handle in handles {
        let ids = handle.join().unwrap();
        // Each caller sees its own ids in increasing order.
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        for id in ids {
            assert!(all_ids.insert(id), "Duplicate order id detected: {}", id);
        }
    }

    let total = num_threads as usize * per_thread;
    assert_eq!(all_ids.len(), total);
    for id in 1..=(total as u64) {
        assert!(all_ids.contains(&id), "Gap in ids at: {}", id);
    }
}

#[test]
fn test_runner_four_by_thousand() {
    let runner = ConcurrentRunner::new(Arc::new(OrderFactory::default()));
    let output = runner.run(4, 1_000).unwrap();

    assert_eq!(output.orders.len(), 4_000);
    assert_eq!(output.error_count, 0);

    let ids: HashSet<u64> = output.orders.iter().map(|o| o.order_id.value()).collect();
    assert_eq!(ids.len(), 4_000);

    for worker in 0..4u64 {
        let slice = &output.orders[(worker as usize) * 1_000..(worker as usize + 1) * 1_000];
        assert!(slice.iter().all(|o| o.thread_id == Some(worker)));
        // Ids within one worker increase even though they interleave across workers.
        assert!(slice.windows(2).all(|w| w[0].order_id < w[1].order_id));
    }
}

#[test]
fn test_runner_one_failed_worker() {
    let runner = ConcurrentRunner::new(Arc::new(OrderFactory::default()));
    let output = runner
        .run_with(4, 1_000, |factory, ctx| {
            if ctx.worker == 0 {
                return Err(WorkerError::Failed {
                    worker: ctx.worker,
                    reason: "injected failure".to_string(),
                });
            }
            generate_worker_orders(factory, ctx)
        })
        .unwrap();

    assert_eq!(output.orders.len(), 3_000);
    assert_eq!(output.error_count, 1);
    assert_eq!(output.orders[0].thread_id, Some(1));
}

#[test]
fn test_seeded_workers_reproducible() {
    let run = || {
        ConcurrentRunner::new(Arc::new(OrderFactory::default()))
            .with_seed(Some(77))
            .run(3, 200)
            .unwrap()
    };
    let a = run();
    let b = run();

    let fields = |orders: &[types::order::Order]| {
        orders
            .iter()
            .map(|o| (o.symbol.clone(), o.side, o.price, o.quantity))
            .collect::<Vec<_>>()
    };
    assert_eq!(fields(&a.orders), fields(&b.orders));
}
