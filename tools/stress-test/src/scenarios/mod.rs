//! Scenario catalog
//!
//! A fixed, ordered set of probability-weighted order transformations.
//! Selection walks the catalog accumulating probabilities and picks the
//! first entry whose cumulative probability reaches the draw, so catalog
//! order is the tie-break.

pub mod market_stress;

use crate::errors::ConfigError;
use crate::factory::OrderFactory;
use rand::Rng;
use serde::{Deserialize, Serialize};
use types::errors::OrderError;
use types::order::Order;

/// Transformation applied to a freshly generated order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Plain generated order
    NormalTrading,
    /// Price multiplied by a uniform factor, re-rounded to 2 dp
    PriceVolatility { min_factor: f64, max_factor: f64 },
    /// Quantity overwritten with a uniform large size
    LargeOrders { min_quantity: u64, max_quantity: u64 },
    /// Type overwritten to CANCEL referencing an id in [1, counter]
    CancelHeavy,
}

impl ScenarioKind {
    pub fn price_volatility() -> Self {
        ScenarioKind::PriceVolatility { min_factor: 0.8, max_factor: 1.2 }
    }

    pub fn large_orders() -> Self {
        ScenarioKind::LargeOrders { min_quantity: 10_000, max_quantity: 100_000 }
    }

    /// Display name used to tag orders.
    pub fn default_name(&self) -> &'static str {
        match self {
            ScenarioKind::NormalTrading => "Normal Trading",
            ScenarioKind::PriceVolatility { .. } => "Price Volatility",
            ScenarioKind::LargeOrders { .. } => "Large Orders",
            ScenarioKind::CancelHeavy => "Cancel Heavy",
        }
    }

    /// Transform `order`. The result is validated before it is returned.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        mut order: Order,
        factory: &OrderFactory,
        rng: &mut R,
    ) -> Result<Order, OrderError> {
        match self {
            ScenarioKind::NormalTrading => {}
            ScenarioKind::PriceVolatility { min_factor, max_factor } => {
                let factor = rng.gen_range(*min_factor..=*max_factor);
                order.price = order
                    .price
                    .scale(factor)
                    .ok_or_else(|| OrderError::InvalidPrice(format!("{} x {}", order.price, factor)))?;
            }
            ScenarioKind::LargeOrders { min_quantity, max_quantity } => {
                order.quantity = rng.gen_range(*min_quantity..=*max_quantity);
            }
            ScenarioKind::CancelHeavy => {
                let counter = factory.current_counter();
                order = order.into_cancel(rng.gen_range(1..=counter));
            }
        }
        order.validate()?;
        Ok(order)
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        match self {
            ScenarioKind::PriceVolatility { min_factor, max_factor } => {
                if !min_factor.is_finite() || !max_factor.is_finite() || *min_factor < 0.0 || min_factor > max_factor {
                    return Err(ConfigError::InvalidRange {
                        field: format!("{name} price factor"),
                        min: min_factor.to_string(),
                        max: max_factor.to_string(),
                    });
                }
            }
            ScenarioKind::LargeOrders { min_quantity, max_quantity } => {
                if min_quantity > max_quantity {
                    return Err(ConfigError::InvalidRange {
                        field: format!("{name} quantity"),
                        min: min_quantity.to_string(),
                        max: max_quantity.to_string(),
                    });
                }
            }
            ScenarioKind::NormalTrading | ScenarioKind::CancelHeavy => {}
        }
        Ok(())
    }
}

/// One weighted catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub probability: f64,
    #[serde(flatten)]
    pub kind: ScenarioKind,
}

impl CatalogEntry {
    pub fn new(kind: ScenarioKind, probability: f64) -> Self {
        Self {
            name: kind.default_name().to_string(),
            probability,
            kind,
        }
    }
}

/// Ordered, validated list of weighted scenarios.
///
/// Probabilities need not sum to 1. A draw beyond the cumulative total
/// selects nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioCatalog {
    entries: Vec<CatalogEntry>,
}

impl ScenarioCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for entry in &entries {
            if !entry.probability.is_finite() || !(0.0..=1.0).contains(&entry.probability) {
                return Err(ConfigError::InvalidProbability {
                    scenario: entry.name.clone(),
                    probability: entry.probability,
                });
            }
            entry.kind.validate(&entry.name)?;
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Sum of all probabilities.
    pub fn total_probability(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }

    /// First entry whose cumulative probability is at least `draw`.
    pub fn select(&self, draw: f64) -> Option<&CatalogEntry> {
        let mut cumulative = 0.0;
        for entry in &self.entries {
            cumulative += entry.probability;
            if draw <= cumulative {
                return Some(entry);
            }
        }
        None
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self {
            entries: default_entries(),
        }
    }
}

/// Normal 70%, volatility 15%, large 10%, cancel 5%.
pub fn default_entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(ScenarioKind::NormalTrading, 0.70),
        CatalogEntry::new(ScenarioKind::price_volatility(), 0.15),
        CatalogEntry::new(ScenarioKind::large_orders(), 0.10),
        CatalogEntry::new(ScenarioKind::CancelHeavy, 0.05),
    ]
}
