//! Error types for order records
//!
//! Validation taxonomy using thiserror

use thiserror::Error;

/// Order validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Order {order_id} has an empty symbol")]
    EmptySymbol { order_id: u64 },

    #[error("Cancel order {order_id} does not reference an original order")]
    MissingOriginalOrder { order_id: u64 },
}
