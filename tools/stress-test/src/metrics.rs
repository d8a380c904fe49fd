//! Performance analysis over a finished order set
//!
//! Counts, throughput and categorical/numeric summaries. Orders with a zero
//! price or zero quantity are left out of the matching numeric summary, and
//! side counts only track BUY and SELL.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use types::numeric::Price;
use types::order::{Order, Side};

/// Min / max / mean over non-zero prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceStats {
    pub min: Price,
    pub max: Price,
    pub mean: Decimal,
}

/// Min / max / mean over non-zero quantities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityStats {
    pub min: u64,
    pub max: u64,
    pub mean: f64,
}

/// Fixed BUY/SELL tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SideCounts {
    #[serde(rename = "BUY")]
    pub buy: usize,
    #[serde(rename = "SELL")]
    pub sell: usize,
}

/// Statistics for a non-empty order set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderStats {
    pub total_orders: usize,
    pub elapsed_secs: f64,
    pub orders_per_second: f64,
    pub error_count: u64,
    pub symbols: BTreeMap<String, usize>,
    pub sides: SideCounts,
    pub types: BTreeMap<String, usize>,
    pub price: Option<PriceStats>,
    pub quantity: Option<QuantityStats>,
}

/// Analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PerformanceReport {
    /// Nothing to analyze
    NoOrders,
    Summary(Box<OrderStats>),
}

impl PerformanceReport {
    pub fn stats(&self) -> Option<&OrderStats> {
        match self {
            PerformanceReport::NoOrders => None,
            PerformanceReport::Summary(stats) => Some(stats),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PerformanceReport::NoOrders)
    }
}

/// Incremental analyzer; feed orders, then `finish`.
#[derive(Debug, Clone, Default)]
pub struct PerformanceAnalyzer {
    total_orders: usize,
    symbols: BTreeMap<String, usize>,
    sides: SideCounts,
    types: BTreeMap<String, usize>,
    price_min: Option<Price>,
    price_max: Option<Price>,
    price_sum: Decimal,
    price_count: u64,
    quantity_min: Option<u64>,
    quantity_max: Option<u64>,
    quantity_sum: u128,
    quantity_count: u64,
}

impl PerformanceAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single order.
    pub fn record(&mut self, order: &Order) {
        self.total_orders += 1;
        *self.symbols.entry(order.symbol.clone()).or_insert(0) += 1;
        match order.side {
            Side::BUY => self.sides.buy += 1,
            Side::SELL => self.sides.sell += 1,
        }
        *self.types.entry(order.order_type.as_str().to_string()).or_insert(0) += 1;

        if !order.price.is_zero() {
            self.price_min = Some(self.price_min.map_or(order.price, |p| p.min(order.price)));
            self.price_max = Some(self.price_max.map_or(order.price, |p| p.max(order.price)));
            self.price_sum += order.price.as_decimal();
            self.price_count += 1;
        }

        if order.quantity != 0 {
            self.quantity_min = Some(self.quantity_min.map_or(order.quantity, |q| q.min(order.quantity)));
            self.quantity_max = Some(self.quantity_max.map_or(order.quantity, |q| q.max(order.quantity)));
            self.quantity_sum += u128::from(order.quantity);
            self.quantity_count += 1;
        }
    }

    /// Record every order in a slice.
    pub fn ingest(&mut self, orders: &[Order]) {
        for order in orders {
            self.record(order);
        }
    }

    /// Build the report. `elapsed_secs` is taken as given.
    pub fn finish(self, elapsed_secs: f64, error_count: u64) -> PerformanceReport {
        if self.total_orders == 0 {
            return PerformanceReport::NoOrders;
        }

        let orders_per_second = if elapsed_secs > 0.0 {
            self.total_orders as f64 / elapsed_secs
        } else {
            0.0
        };

        let price = match (self.price_min, self.price_max) {
            (Some(min), Some(max)) => Some(PriceStats {
                min,
                max,
                mean: self.price_sum / Decimal::from(self.price_count),
            }),
            _ => None,
        };

        let quantity = match (self.quantity_min, self.quantity_max) {
            (Some(min), Some(max)) => Some(QuantityStats {
                min,
                max,
                mean: self.quantity_sum as f64 / self.quantity_count as f64,
            }),
            _ => None,
        };

        PerformanceReport::Summary(Box::new(OrderStats {
            total_orders: self.total_orders,
            elapsed_secs,
            orders_per_second,
            error_count,
            symbols: self.symbols,
            sides: self.sides,
            types: self.types,
            price,
            quantity,
        }))
    }
}

/// Analyze a complete order set.
pub fn analyze(orders: &[Order], elapsed_secs: f64, error_count: u64) -> PerformanceReport {
    let mut analyzer = PerformanceAnalyzer::new();
    analyzer.ingest(orders);
    analyzer.finish(elapsed_secs, error_count)
}

fn fmt_counts(f: &mut fmt::Formatter<'_>, counts: &BTreeMap<String, usize>) -> fmt::Result {
    let parts: Vec<String> = counts.iter().map(|(k, v)| format!("{k}: {v}")).collect();
    write!(f, "{{{}}}", parts.join(", "))
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = match self {
            PerformanceReport::NoOrders => return writeln!(f, "No orders to analyze"),
            PerformanceReport::Summary(stats) => stats,
        };

        writeln!(f, "=== Performance Analysis ===")?;
        writeln!(f, "Total Orders Generated: {}", stats.total_orders)?;
        writeln!(f, "Total Time: {:.2} seconds", stats.elapsed_secs)?;
        writeln!(f, "Orders per Second: {:.2}", stats.orders_per_second)?;
        writeln!(f, "Errors: {}", stats.error_count)?;

        write!(f, "\nSymbol Distribution: ")?;
        fmt_counts(f, &stats.symbols)?;
        writeln!(f)?;
        writeln!(f, "Side Distribution: {{BUY: {}, SELL: {}}}", stats.sides.buy, stats.sides.sell)?;
        write!(f, "Type Distribution: ")?;
        fmt_counts(f, &stats.types)?;
        writeln!(f)?;

        if let Some(price) = &stats.price {
            writeln!(f, "\nPrice Stats:")?;
            writeln!(f, "  Min: ${}", price.min)?;
            writeln!(f, "  Max: ${}", price.max)?;
            writeln!(f, "  Avg: ${:.2}", price.mean)?;
        }

        if let Some(quantity) = &stats.quantity {
            writeln!(f, "\nQuantity Stats:")?;
            writeln!(f, "  Min: {}", quantity.min)?;
            writeln!(f, "  Max: {}", quantity.max)?;
            writeln!(f, "  Avg: {:.0}", quantity.mean)?;
        }
        Ok(())
    }
}

impl OrderStats {
    /// Mean price as a float, if any price was counted.
    pub fn mean_price(&self) -> Option<f64> {
        self.price.as_ref().and_then(|p| p.mean.to_f64())
    }
}
