//! Order record types
//!
//! The `Order` struct serializes to the exact record shape consumed by the
//! matching engine: base fields in camelCase, followed by optional tagging
//! fields in snake_case that are omitted when unset.

use crate::errors::OrderError;
use crate::ids::OrderId;
use crate::numeric::Price;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::BUY => "BUY",
            Side::SELL => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order instruction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Rests at `price` if not matched
    LIMIT,
    /// Executes at best available price; `price` is informational
    MARKET,
    /// Cancels `original_order_id`
    CANCEL,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::LIMIT => "LIMIT",
            OrderType::MARKET => "MARKET",
            OrderType::CANCEL => "CANCEL",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current wall-clock time as fractional Unix seconds.
pub fn timestamp_now() -> f64 {
    let now = Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_nanos()) / 1_000_000_000.0
}

/// Synthetic order record
///
/// Field declaration order is the serialized field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
    #[serde(rename = "clientId")]
    pub client_id: u32,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    pub price: Price,
    pub quantity: u64,
    /// Unix seconds with sub-second precision
    pub timestamp: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_order_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_order_index: Option<u64>,
}

impl Order {
    /// Create an untagged LIMIT order
    pub fn new(
        order_id: OrderId,
        client_id: u32,
        symbol: impl Into<String>,
        side: Side,
        price: Price,
        quantity: u64,
        timestamp: f64,
    ) -> Self {
        Self {
            order_id,
            client_id,
            symbol: symbol.into(),
            order_type: OrderType::LIMIT,
            side,
            price,
            quantity,
            timestamp,
            original_order_id: None,
            scenario: None,
            batch: None,
            batch_index: None,
            thread_id: None,
            thread_order_index: None,
        }
    }

    /// Tag with the scenario that produced this order
    pub fn with_scenario(mut self, name: impl Into<String>) -> Self {
        self.scenario = Some(name.into());
        self
    }

    /// Tag with paced-batch position
    pub fn with_batch(mut self, batch: u64, index: u64) -> Self {
        self.batch = Some(batch);
        self.batch_index = Some(index);
        self
    }

    /// Tag with worker identity and per-worker sequence
    pub fn with_thread(mut self, thread_id: u64, index: u64) -> Self {
        self.thread_id = Some(thread_id);
        self.thread_order_index = Some(index);
        self
    }

    /// Turn this order into a cancel of `original_order_id`
    ///
    /// Side, price and quantity from base generation are kept.
    pub fn into_cancel(mut self, original_order_id: u64) -> Self {
        self.order_type = OrderType::CANCEL;
        self.original_order_id = Some(original_order_id);
        self
    }

    pub fn is_cancel(&self) -> bool {
        self.order_type == OrderType::CANCEL
    }

    /// Check the invariants every generated order must hold
    pub fn validate(&self) -> Result<(), OrderError> {
        let order_id = self.order_id.value();
        if self.symbol.is_empty() {
            return Err(OrderError::EmptySymbol { order_id });
        }
        if !self.price.is_positive() {
            return Err(OrderError::InvalidPrice(self.price.to_string()));
        }
        if self.quantity == 0 {
            return Err(OrderError::InvalidQuantity(self.quantity.to_string()));
        }
        if self.is_cancel() && !matches!(self.original_order_id, Some(id) if id >= 1) {
            return Err(OrderError::MissingOriginalOrder { order_id });
        }
        Ok(())
    }
}
