//! Synthetic order factory
//!
//! Produces single order records with uniformly drawn fields and a
//! process-wide increasing id. The id counter is the only state shared
//! between concurrent callers; every other draw comes from the caller's RNG.

use crate::errors::ConfigError;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use std::sync::{Mutex, PoisonError};
use types::ids::OrderId;
use types::numeric::Price;
use types::order::{timestamp_now, Order, OrderType, Side};

/// Symbols used when none are configured.
pub const DEFAULT_SYMBOLS: [&str; 5] = ["AAPL", "GOOGL", "MSFT", "TSLA", "AMZN"];

/// Inclusive client id range.
pub const CLIENT_ID_RANGE: (u32, u32) = (1, 1000);
/// Inclusive quantity range for plain orders.
pub const QUANTITY_RANGE: (u64, u64) = (1, 1000);
/// Inclusive price range in cents (95.00 to 105.00).
pub const PRICE_CENTS_RANGE: (i64, i64) = (9_500, 10_500);

/// Thread-safe generator of synthetic orders.
#[derive(Debug)]
pub struct OrderFactory {
    symbols: Vec<String>,
    counter: Mutex<u64>,
}

impl OrderFactory {
    /// Create a factory over a symbol set. The set must not be empty.
    pub fn new<I, S>(symbols: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        if symbols.is_empty() {
            return Err(ConfigError::EmptySymbolSet);
        }
        Ok(Self {
            symbols,
            counter: Mutex::new(1),
        })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Issue a fresh order id.
    ///
    /// The lock is held only for the increment-and-read.
    pub fn next_id(&self) -> OrderId {
        let mut counter = self.counter.lock().unwrap_or_else(PoisonError::into_inner);
        let id = *counter;
        *counter += 1;
        OrderId::new(id)
    }

    /// Current counter value, i.e. the next id that will be issued.
    pub fn current_counter(&self) -> u64 {
        *self.counter.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Generate one order stamped with the current time.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Order {
        let order_id = self.next_id();

        let client_id = rng.gen_range(CLIENT_ID_RANGE.0..=CLIENT_ID_RANGE.1);
        let symbol = self.symbols[rng.gen_range(0..self.symbols.len())].clone();
        let order_type = if rng.gen_bool(0.5) { OrderType::LIMIT } else { OrderType::MARKET };
        let side = if rng.gen_bool(0.5) { Side::BUY } else { Side::SELL };
        let cents = rng.gen_range(PRICE_CENTS_RANGE.0..=PRICE_CENTS_RANGE.1);
        let price = Price::new(Decimal::new(cents, 2));
        let quantity = rng.gen_range(QUANTITY_RANGE.0..=QUANTITY_RANGE.1);

        let mut order = Order::new(order_id, client_id, symbol, side, price, quantity, timestamp_now());
        order.order_type = order_type;
        order
    }

    /// Generate `count` orders whose timestamps are spread evenly over
    /// `[now, now + duration_secs)`, independent of real generation time.
    pub fn generate_burst<R: Rng + ?Sized>(
        &self,
        count: usize,
        duration_secs: f64,
        rng: &mut R,
    ) -> Result<Vec<Order>, ConfigError> {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(ConfigError::InvalidDuration(duration_secs));
        }

        let start = timestamp_now();
        let mut orders = Vec::with_capacity(count);
        for i in 0..count {
            let mut order = self.generate(rng);
            order.timestamp = burst_timestamp(start, i, count, duration_secs);
            orders.push(order);
        }
        Ok(orders)
    }
}

impl Default for OrderFactory {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            counter: Mutex::new(1),
        }
    }
}

/// Represented event time of the `index`-th order of a burst.
pub fn burst_timestamp(start: f64, index: usize, count: usize, duration_secs: f64) -> f64 {
    start + index as f64 * duration_secs / count as f64
}

/// RNG for one generation stream.
///
/// With a seed, each stream gets `seed + stream` so parallel workers draw
/// independent but reproducible sequences.
pub fn rng_for(seed: Option<u64>, stream: u64) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(stream)),
        None => ChaCha8Rng::from_entropy(),
    }
}
