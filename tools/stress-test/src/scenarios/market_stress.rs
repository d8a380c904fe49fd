//! Market stress scenario
//!
//! Fills `orders` slots by drawing a catalog scenario per slot, generating
//! a base order and applying that scenario's transform. A transform that
//! fails is counted and its order dropped; the run always continues.

use crate::factory::OrderFactory;
use crate::scenarios::ScenarioCatalog;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use types::order::Order;

/// Configuration for the market stress scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketStressConfig {
    /// Number of scenario draws
    pub orders: usize,
}

impl Default for MarketStressConfig {
    fn default() -> Self {
        Self { orders: 5_000 }
    }
}

/// Output of a market stress run.
#[derive(Debug, Clone, Default)]
pub struct MarketStressRun {
    pub orders: Vec<Order>,
    pub error_count: u64,
}

impl MarketStressRun {
    /// Order count per scenario tag.
    pub fn scenario_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for order in &self.orders {
            if let Some(name) = &order.scenario {
                *counts.entry(name.clone()).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Run the market stress scenario.
pub fn run<R: Rng + ?Sized>(
    factory: &OrderFactory,
    catalog: &ScenarioCatalog,
    config: &MarketStressConfig,
    rng: &mut R,
) -> MarketStressRun {
    let mut result = MarketStressRun {
        orders: Vec::with_capacity(config.orders),
        error_count: 0,
    };

    for _ in 0..config.orders {
        let draw: f64 = rng.gen();
        let Some(entry) = catalog.select(draw) else {
            continue;
        };

        let base = factory.generate(rng);
        match entry.kind.apply(base, factory, rng) {
            Ok(order) => result.orders.push(order.with_scenario(entry.name.clone())),
            Err(err) => {
                tracing::warn!(scenario = %entry.name, error = %err, "skipping order");
                result.error_count += 1;
            }
        }
    }

    tracing::debug!(
        orders = result.orders.len(),
        errors = result.error_count,
        "market stress run finished"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::rng_for;
    use crate::scenarios::{CatalogEntry, ScenarioKind};
    use types::order::OrderType;

    #[test]
    fn test_market_stress_default_catalog() {
        let factory = OrderFactory::default();
        let catalog = ScenarioCatalog::default();
        let mut rng = rng_for(Some(42), 0);
        let config = MarketStressConfig { orders: 1_000 };

        let result = run(&factory, &catalog, &config, &mut rng);
        assert_eq!(result.error_count, 0);
        assert_eq!(result.orders.len(), 1_000);
        assert!(result.orders.iter().all(|o| o.scenario.is_some()));

        let counts = result.scenario_counts();
        assert!(counts["Normal Trading"] > counts["Price Volatility"]);
    }

    #[test]
    fn test_cancel_orders_tagged() {
        let factory = OrderFactory::default();
        let catalog = ScenarioCatalog::default();
        let mut rng = rng_for(Some(42), 0);
        let result = run(&factory, &catalog, &MarketStressConfig { orders: 2_000 }, &mut rng);

        let cancels: Vec<&Order> = result
            .orders
            .iter()
            .filter(|o| o.scenario.as_deref() == Some("Cancel Heavy"))
            .collect();
        assert!(!cancels.is_empty());
        for order in cancels {
            assert_eq!(order.order_type, OrderType::CANCEL);
            assert!(order.original_order_id.unwrap() >= 1);
            assert!(order.original_order_id.unwrap() <= order.order_id.value() + 1);
        }
    }

    #[test]
    fn test_failing_transform_skipped_and_counted() {
        let factory = OrderFactory::default();
        let catalog = ScenarioCatalog::new(vec![
            CatalogEntry::new(ScenarioKind::NormalTrading, 0.5),
            CatalogEntry::new(ScenarioKind::PriceVolatility { min_factor: 0.0, max_factor: 0.0 }, 0.5),
        ])
        .unwrap();
        let mut rng = rng_for(Some(1), 0);

        let result = run(&factory, &catalog, &MarketStressConfig { orders: 400 }, &mut rng);
        assert!(result.error_count > 0);
        assert_eq!(result.orders.len() as u64 + result.error_count, 400);
        assert!(result
            .orders
            .iter()
            .all(|o| o.scenario.as_deref() == Some("Normal Trading")));
    }

    #[test]
    fn test_partial_catalog_skips_unselected_draws() {
        let factory = OrderFactory::default();
        let catalog = ScenarioCatalog::new(vec![CatalogEntry::new(ScenarioKind::NormalTrading, 0.5)]).unwrap();
        let mut rng = rng_for(Some(3), 0);

        let result = run(&factory, &catalog, &MarketStressConfig { orders: 1_000 }, &mut rng);
        assert_eq!(result.error_count, 0);
        assert!(result.orders.len() < 1_000);
        assert!(result.orders.len() > 300);
    }
}
