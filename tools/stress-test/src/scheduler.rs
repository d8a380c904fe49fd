//! Rate scheduler
//!
//! Two pacing modes over the order factory:
//! - burst: generate as fast as possible and spread represented timestamps
//!   evenly over the requested duration (no sleeping)
//! - paced: generate in batches and sleep off whatever is left of each
//!   batch's ideal duration, capping throughput at the target rate

use crate::errors::ConfigError;
use crate::factory::OrderFactory;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::{Duration, Instant};
use types::order::Order;

/// Upper bound on orders generated between two pacing checks.
pub const MAX_BATCH_SIZE: u64 = 1_000;

/// Blocks the calling thread between batches.
pub trait Pacer {
    fn pause(&mut self, duration: Duration);
}

/// Pacer backed by `thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Burst-mode parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    pub count: usize,
    /// Span of represented event time in seconds
    pub duration_secs: f64,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self { count: 100, duration_secs: 1.0 }
    }
}

/// Batched-rate parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighFrequencyConfig {
    pub duration_secs: u64,
    pub orders_per_second: u64,
}

impl Default for HighFrequencyConfig {
    fn default() -> Self {
        Self { duration_secs: 10, orders_per_second: 500 }
    }
}

impl HighFrequencyConfig {
    pub fn total_orders(&self) -> Option<u64> {
        self.duration_secs.checked_mul(self.orders_per_second)
    }

    pub fn batch_size(&self) -> u64 {
        self.orders_per_second.min(MAX_BATCH_SIZE)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.orders_per_second == 0 {
            return Err(ConfigError::InvalidRate(self.orders_per_second));
        }
        if self.total_orders().is_none() {
            return Err(ConfigError::InvalidDuration(self.duration_secs as f64));
        }
        Ok(())
    }
}

/// Output of a paced run.
#[derive(Debug, Clone)]
pub struct PacedRun {
    pub orders: Vec<Order>,
    pub batches: u64,
    pub elapsed: Duration,
}

impl PacedRun {
    pub fn orders_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.orders.len() as f64 / secs
    }
}

/// Paces order generation from one factory.
pub struct RateScheduler<'a, P: Pacer = ThreadPacer> {
    factory: &'a OrderFactory,
    pacer: P,
}

impl<'a> RateScheduler<'a> {
    pub fn new(factory: &'a OrderFactory) -> Self {
        Self::with_pacer(factory, ThreadPacer)
    }
}

impl<'a, P: Pacer> RateScheduler<'a, P> {
    pub fn with_pacer(factory: &'a OrderFactory, pacer: P) -> Self {
        Self { factory, pacer }
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Generate a burst with synthetically spread timestamps.
    pub fn burst<R: Rng + ?Sized>(&self, config: &BurstConfig, rng: &mut R) -> Result<Vec<Order>, ConfigError> {
        self.factory.generate_burst(config.count, config.duration_secs, rng)
    }

    /// Generate `duration_secs * orders_per_second` orders in batches of
    /// `min(1000, orders_per_second)`, sleeping after each batch that
    /// finished faster than `batch_len / orders_per_second`.
    ///
    /// A trailing short batch carries any remainder.
    pub fn paced<R: Rng + ?Sized>(
        &mut self,
        config: &HighFrequencyConfig,
        rng: &mut R,
    ) -> Result<PacedRun, ConfigError> {
        config.validate()?;
        let total = config.total_orders().unwrap_or_default();
        let batch_size = config.batch_size();
        let total_batches = total.div_ceil(batch_size);
        let rate = config.orders_per_second as f64;

        tracing::info!(
            duration_secs = config.duration_secs,
            orders_per_second = config.orders_per_second,
            total,
            "starting paced generation"
        );

        let start = Instant::now();
        let mut orders = Vec::with_capacity(total as usize);
        let mut batch: u64 = 0;
        let mut produced: u64 = 0;

        while produced < total {
            let len = batch_size.min(total - produced);
            let batch_start = Instant::now();

            for index in 0..len {
                orders.push(self.factory.generate(rng).with_batch(batch, index));
            }
            produced += len;

            let ideal = Duration::from_secs_f64(len as f64 / rate);
            let spent = batch_start.elapsed();
            if spent < ideal {
                self.pacer.pause(ideal - spent);
            }

            if batch % 10 == 0 {
                tracing::debug!(batch, total_batches, orders = orders.len(), "generated batch");
            }
            batch += 1;
        }

        Ok(PacedRun {
            orders,
            batches: batch,
            elapsed: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::rng_for;

    #[derive(Default)]
    struct RecordingPacer {
        pauses: Vec<Duration>,
    }

    impl Pacer for RecordingPacer {
        fn pause(&mut self, duration: Duration) {
            self.pauses.push(duration);
        }
    }

    #[test]
    fn test_burst_mode_does_not_pause() {
        let factory = OrderFactory::default();
        let scheduler = RateScheduler::with_pacer(&factory, RecordingPacer::default());
        let mut rng = rng_for(Some(1), 0);

        let orders = scheduler
            .burst(&BurstConfig { count: 50, duration_secs: 0.5 }, &mut rng)
            .unwrap();
        assert_eq!(orders.len(), 50);
        assert!(scheduler.pacer().pauses.is_empty());
    }

    #[test]
    fn test_paced_batches_and_tags() {
        let factory = OrderFactory::default();
        let mut scheduler = RateScheduler::with_pacer(&factory, RecordingPacer::default());
        let mut rng = rng_for(Some(1), 0);
        let config = HighFrequencyConfig { duration_secs: 2, orders_per_second: 300 };

        let run = scheduler.paced(&config, &mut rng).unwrap();
        assert_eq!(run.orders.len(), 600);
        assert_eq!(run.batches, 2);
        assert_eq!(run.orders[0].batch, Some(0));
        assert_eq!(run.orders[0].batch_index, Some(0));
        assert_eq!(run.orders[299].batch_index, Some(299));
        assert_eq!(run.orders[300].batch, Some(1));
        assert_eq!(run.orders[300].batch_index, Some(0));

        let pacer = scheduler.pacer();
        assert!(pacer.pauses.len() <= 2);
        assert!(pacer.pauses.iter().all(|p| *p <= Duration::from_secs(1)));
    }

    #[test]
    fn test_batch_size_capped() {
        let factory = OrderFactory::default();
        let mut scheduler = RateScheduler::with_pacer(&factory, RecordingPacer::default());
        let mut rng = rng_for(Some(1), 0);
        let config = HighFrequencyConfig { duration_secs: 1, orders_per_second: 2_500 };

        let run = scheduler.paced(&config, &mut rng).unwrap();
        assert_eq!(run.orders.len(), 2_500);
        assert_eq!(run.batches, 3);
        assert_eq!(run.orders.last().unwrap().batch, Some(2));
        assert_eq!(run.orders.last().unwrap().batch_index, Some(499));
    }

    #[test]
    fn test_zero_rate_rejected() {
        let factory = OrderFactory::default();
        let mut scheduler = RateScheduler::with_pacer(&factory, RecordingPacer::default());
        let mut rng = rng_for(Some(1), 0);
        let config = HighFrequencyConfig { duration_secs: 5, orders_per_second: 0 };

        assert_eq!(
            scheduler.paced(&config, &mut rng).unwrap_err(),
            ConfigError::InvalidRate(0)
        );
    }

    #[test]
    fn test_zero_duration_produces_nothing() {
        let factory = OrderFactory::default();
        let mut scheduler = RateScheduler::with_pacer(&factory, RecordingPacer::default());
        let mut rng = rng_for(Some(1), 0);
        let config = HighFrequencyConfig { duration_secs: 0, orders_per_second: 100 };

        let run = scheduler.paced(&config, &mut rng).unwrap();
        assert!(run.orders.is_empty());
        assert_eq!(run.batches, 0);
    }

    #[test]
    fn test_thread_pacer_caps_rate() {
        let factory = OrderFactory::default();
        let mut scheduler = RateScheduler::new(&factory);
        let mut rng = rng_for(Some(1), 0);
        let config = HighFrequencyConfig { duration_secs: 1, orders_per_second: 200 };

        let run = scheduler.paced(&config, &mut rng).unwrap();
        assert_eq!(run.orders.len(), 200);
        assert!(run.elapsed >= Duration::from_millis(900));
        assert!(run.orders_per_second() <= 230.0);
    }
}
