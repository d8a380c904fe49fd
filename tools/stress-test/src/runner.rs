//! Concurrent multi-worker generation
//!
//! Spawns one OS thread per worker. Workers share only the factory's id
//! counter; each draws from its own RNG stream. Results are merged in
//! worker-submission order and worker failures are summed at merge time.

use crate::errors::{ConfigError, WorkerError};
use crate::factory::{rng_for, OrderFactory};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use types::order::Order;

/// Default per-worker completion bound.
pub const DEFAULT_WORKER_TIMEOUT: Duration = Duration::from_secs(30);

/// Concurrent load parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrentConfig {
    pub workers: usize,
    pub orders_per_worker: usize,
}

impl Default for ConcurrentConfig {
    fn default() -> Self {
        Self { workers: 4, orders_per_worker: 1_000 }
    }
}

/// What a worker job is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerContext {
    pub worker: usize,
    pub orders: usize,
    pub seed: Option<u64>,
}

/// Merged output of a concurrent run.
#[derive(Debug, Clone, Default)]
pub struct RunnerOutput {
    pub orders: Vec<Order>,
    pub error_count: u64,
    pub failures: Vec<WorkerError>,
    pub elapsed: Duration,
}

impl RunnerOutput {
    pub fn orders_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.orders.len() as f64 / secs
    }
}

/// Default worker job: `ctx.orders` orders tagged with worker identity.
pub fn generate_worker_orders(factory: &OrderFactory, ctx: WorkerContext) -> Result<Vec<Order>, WorkerError> {
    let mut rng = rng_for(ctx.seed, ctx.worker as u64);
    let orders = (0..ctx.orders)
        .map(|index| {
            factory
                .generate(&mut rng)
                .with_thread(ctx.worker as u64, index as u64)
        })
        .collect();
    Ok(orders)
}

/// Fans generation out over worker threads.
#[derive(Debug, Clone)]
pub struct ConcurrentRunner {
    factory: Arc<OrderFactory>,
    timeout: Duration,
    seed: Option<u64>,
}

impl ConcurrentRunner {
    pub fn new(factory: Arc<OrderFactory>) -> Self {
        Self {
            factory,
            timeout: DEFAULT_WORKER_TIMEOUT,
            seed: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `worker_count` workers generating `orders_per_worker` orders each.
    pub fn run(&self, worker_count: usize, orders_per_worker: usize) -> Result<RunnerOutput, ConfigError> {
        self.run_with(worker_count, orders_per_worker, generate_worker_orders)
    }

    /// Run workers executing a custom job.
    ///
    /// A job that errors, panics or misses the deadline (timeout measured
    /// from dispatch) contributes no orders and one error. Timed-out
    /// threads are detached, never joined.
    pub fn run_with<F>(
        &self,
        worker_count: usize,
        orders_per_worker: usize,
        job: F,
    ) -> Result<RunnerOutput, ConfigError>
    where
        F: Fn(&OrderFactory, WorkerContext) -> Result<Vec<Order>, WorkerError> + Send + Sync + 'static,
    {
        if worker_count == 0 {
            return Err(ConfigError::InvalidWorkerCount(worker_count));
        }

        tracing::info!(workers = worker_count, orders_per_worker, "starting concurrent run");

        let job = Arc::new(job);
        let start = Instant::now();
        let deadline = start + self.timeout;

        let mut pending = Vec::with_capacity(worker_count);
        for worker in 0..worker_count {
            let (tx, rx) = mpsc::sync_channel(1);
            let factory = Arc::clone(&self.factory);
            let job = Arc::clone(&job);
            let ctx = WorkerContext {
                worker,
                orders: orders_per_worker,
                seed: self.seed,
            };

            let spawned = thread::Builder::new()
                .name(format!("stress-worker-{worker}"))
                .spawn(move || {
                    // Receiver may be gone after a timeout.
                    let _ = tx.send(job(factory.as_ref(), ctx));
                });
            match spawned {
                Ok(_) => pending.push((worker, Some(rx))),
                Err(err) => {
                    tracing::warn!(worker, error = %err, "failed to spawn worker");
                    pending.push((worker, None));
                }
            }
        }

        let mut output = RunnerOutput {
            orders: Vec::with_capacity(worker_count * orders_per_worker),
            ..Default::default()
        };

        for (worker, rx) in pending {
            let outcome = match rx {
                None => Err(WorkerError::Failed {
                    worker,
                    reason: "thread spawn failed".to_string(),
                }),
                Some(rx) => {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match rx.recv_timeout(wait) {
                        Ok(result) => result,
                        Err(RecvTimeoutError::Timeout) => Err(WorkerError::TimedOut {
                            worker,
                            timeout: self.timeout,
                        }),
                        Err(RecvTimeoutError::Disconnected) => Err(WorkerError::Panicked { worker }),
                    }
                }
            };

            match outcome {
                Ok(mut orders) => output.orders.append(&mut orders),
                Err(err) => {
                    tracing::warn!(error = %err, "worker contributed no orders");
                    output.failures.push(err);
                }
            }
        }

        output.error_count = output.failures.len() as u64;
        output.elapsed = start.elapsed();

        tracing::info!(
            orders = output.orders.len(),
            errors = output.error_count,
            elapsed_ms = output.elapsed.as_millis() as u64,
            "concurrent run finished"
        );
        Ok(output)
    }
}
