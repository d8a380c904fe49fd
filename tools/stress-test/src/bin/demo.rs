//! Walkthrough of order generation, stress scenarios and JSON output.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use stress_test::factory::OrderFactory;
use stress_test::metrics::analyze;
use stress_test::scenarios::market_stress::{self, MarketStressConfig};
use stress_test::scenarios::ScenarioCatalog;
use stress_test::scheduler::{BurstConfig, RateScheduler};

fn demo_order_generation(rng: &mut ChaCha8Rng) -> anyhow::Result<()> {
    println!("=== Order Generation Demo ===");
    let factory = OrderFactory::new(["DEMO", "TEST", "EXAMPLE"])?;

    println!("Sample generated orders:");
    for i in 0..5 {
        let order = factory.generate(rng);
        println!(
            "  {}. Order {}: {} {} {} @ {} ({})",
            i + 1,
            order.order_id,
            order.side,
            order.quantity,
            order.symbol,
            order.price,
            order.order_type
        );
    }
    println!();
    Ok(())
}

fn demo_stress_scenarios(rng: &mut ChaCha8Rng) -> anyhow::Result<()> {
    println!("=== Stress Testing Scenarios Demo ===");
    let factory = OrderFactory::default();

    println!("1. Quick Burst Test (50 orders in 0.5 seconds)");
    let burst = RateScheduler::new(&factory).burst(&BurstConfig { count: 50, duration_secs: 0.5 }, rng)?;
    println!("   Generated {} orders", burst.len());

    println!("2. Market Stress Test (100 orders with different scenarios)");
    let start = Instant::now();
    let stress = market_stress::run(&factory, &ScenarioCatalog::default(), &MarketStressConfig { orders: 100 }, rng);
    let elapsed = start.elapsed().as_secs_f64();
    println!("   Generated {} orders", stress.orders.len());

    println!("3. Performance Analysis:");
    print!("{}", analyze(&stress.orders, elapsed, stress.error_count));
    println!();
    Ok(())
}

fn demo_json_output(rng: &mut ChaCha8Rng) -> anyhow::Result<()> {
    println!("=== JSON Output Demo ===");
    let factory = OrderFactory::new(["JSON", "DEMO"])?;
    let orders: Vec<_> = (0..3).map(|_| factory.generate(rng)).collect();

    println!("Sample JSON orders:");
    println!("{}", stress_test::export::export_json(&orders)?);
    println!();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    stress_test::init_tracing().map_err(anyhow::Error::msg)?;

    println!("Order Load Generator Demo");
    println!("{}", "=".repeat(50));

    let mut rng = ChaCha8Rng::from_entropy();
    demo_order_generation(&mut rng)?;
    demo_stress_scenarios(&mut rng)?;
    demo_json_output(&mut rng)?;

    println!("Demo completed successfully!");
    println!("\nTo run the full stress test, execute:");
    println!("  cargo run --bin stress_test");
    Ok(())
}
