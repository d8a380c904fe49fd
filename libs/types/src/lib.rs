//! Types library for the synthetic order load generator
//!
//! Defines the order record exchanged with the matching engine under test.
//! The JSON shape produced by these types is the interchange format, so
//! field names and ordering are part of the contract.
//!
//! # Modules
//! - `ids`: Order identifiers
//! - `numeric`: Fixed-point price type (2 dp)
//! - `order`: Order record, order type and side
//! - `errors`: Order validation errors

// Public modules
pub mod ids;
pub mod numeric;
pub mod order;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::errors::*;
}
