//! Wire format test
//!
//! Generated order sets written to disk must read back field-for-field
//! and keep the record shape the matching engine expects.

use std::fs;
use std::sync::Arc;
use stress_test::export::{load_orders, save_orders};
use stress_test::factory::{rng_for, OrderFactory};
use stress_test::runner::ConcurrentRunner;
use stress_test::scenarios::market_stress::{self, MarketStressConfig};
use stress_test::scenarios::ScenarioCatalog;
use stress_test::scheduler::{HighFrequencyConfig, Pacer, RateScheduler};
use std::time::Duration;

struct NoPause;

impl Pacer for NoPause {
    fn pause(&mut self, _duration: Duration) {}
}

#[test]
fn test_tagged_orders_roundtrip() {
    let factory = Arc::new(OrderFactory::default());
    let mut rng = rng_for(Some(21), 0);

    let mut orders = market_stress::run(
        &factory,
        &ScenarioCatalog::default(),
        &MarketStressConfig { orders: 500 },
        &mut rng,
    )
    .orders;

    let mut scheduler = RateScheduler::with_pacer(&factory, NoPause);
    orders.extend(
        scheduler
            .paced(&HighFrequencyConfig { duration_secs: 1, orders_per_second: 200 }, &mut rng)
            .unwrap()
            .orders,
    );
    orders.extend(ConcurrentRunner::new(Arc::clone(&factory)).run(2, 100).unwrap().orders);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stress_test_combined.json");
    assert!(save_orders(&path, &orders));

    let loaded = load_orders(&path).unwrap();
    assert_eq!(loaded.len(), orders.len());
    assert_eq!(loaded, orders);
}

#[test]
fn test_record_shape() {
    let factory = OrderFactory::default();
    let mut rng = rng_for(Some(3), 0);
    let order = factory.generate(&mut rng).into_cancel(1).with_scenario("Cancel Heavy");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("one.json");
    assert!(save_orders(&path, &[order]));

    let raw = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = value[0].as_object().unwrap();
    let keys: Vec<&str> = record.keys().map(String::as_str).collect();

    for key in [
        "orderId",
        "clientId",
        "symbol",
        "type",
        "side",
        "price",
        "quantity",
        "timestamp",
        "original_order_id",
        "scenario",
    ] {
        assert!(keys.contains(&key), "missing {key}");
    }
    assert_eq!(record["type"], "CANCEL");
    assert!(record["price"].is_number());
    assert!(!keys.contains(&"batch"));

    // Field order in the file follows declaration order.
    let order_pos = raw.find("\"orderId\"").unwrap();
    let ts_pos = raw.find("\"timestamp\"").unwrap();
    let scenario_pos = raw.find("\"scenario\"").unwrap();
    assert!(order_pos < ts_pos && ts_pos < scenario_pos);
}
