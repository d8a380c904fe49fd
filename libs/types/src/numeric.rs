//! Fixed-point decimal price type
//!
//! Uses rust_decimal for deterministic arithmetic. Every price is held at
//! two decimal places (HALF_UP); the wire form is a plain JSON number.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Price rounded to 2 decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Decimal places kept on every price
    pub const DECIMALS: u32 = 2;

    /// Create a price, rounding to 2 dp.
    pub fn new(value: Decimal) -> Self {
        Self(value.round_dp_with_strategy(Self::DECIMALS, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Convert from a float. Returns None for NaN or infinite input.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Decimal::from_f64(value).map(Self::new)
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// Multiply by a float factor and re-round to 2 dp.
    pub fn scale(&self, factor: f64) -> Option<Self> {
        let factor = Decimal::from_f64(factor)?;
        self.0.checked_mul(factor).map(Self::new)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Price::from_f64(raw).ok_or_else(|| de::Error::custom(format!("invalid price: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_price_rounds_to_two_places() {
        let p = Price::new(Decimal::from_str_exact("100.125").unwrap());
        assert_eq!(p.as_decimal(), Decimal::from_str_exact("100.13").unwrap());

        let p = Price::from_f64(99.994).unwrap();
        assert_eq!(p.as_decimal(), Decimal::from_str_exact("99.99").unwrap());
    }

    #[test]
    fn test_price_rejects_non_finite() {
        assert!(Price::from_f64(f64::NAN).is_none());
        assert!(Price::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn test_price_scale() {
        let p = Price::from_u64(100);
        let scaled = p.scale(1.2).unwrap();
        assert_eq!(scaled.as_decimal(), Decimal::from(120));
    }

    #[test]
    fn test_price_json_is_number() {
        let p = Price::from_f64(101.25).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "101.25");

        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_u64(100).to_string(), "100.00");
    }

    proptest! {
        #[test]
        fn prop_price_json_roundtrip(cents in 0u64..10_000_000) {
            let p = Price::new(Decimal::new(cents as i64, 2));
            let json = serde_json::to_string(&p).unwrap();
            let back: Price = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, p);
        }

        #[test]
        fn prop_price_never_exceeds_two_places(raw in 0.0f64..1_000_000.0) {
            let p = Price::from_f64(raw).unwrap();
            prop_assert!(p.as_decimal().scale() <= Price::DECIMALS);
        }
    }
}
