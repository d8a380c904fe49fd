//! Synthetic order load generator and stress harness
//!
//! Produces streams of synthetic orders for the matching engine at
//! controlled rates and mixes, and reports throughput and distribution
//! statistics over what was produced.
//!
//! # Modules
//! - `factory`: Thread-safe order generation with a shared id counter
//! - `scenarios`: Weighted scenario catalog and the market stress run
//! - `scheduler`: Burst and batched-rate pacing
//! - `runner`: Concurrent multi-worker generation with timeouts
//! - `metrics`: Performance analysis over an order set
//! - `orchestrator`: Named test scenarios, sessions and output files
//! - `export`: JSON persistence of order sets
//! - `config`: Harness configuration
//! - `errors`: Error taxonomy

pub mod errors;
pub mod config;
pub mod factory;
pub mod scenarios;
pub mod scheduler;
pub mod runner;
pub mod metrics;
pub mod orchestrator;
pub mod export;

/// Crate version constant
pub const VERSION: &str = "1.0.0";

/// Install the global tracing subscriber.
///
/// The filter comes from `STRESS_LOG` and defaults to `info`.
pub fn init_tracing() -> Result<(), String> {
    let filter = std::env::var("STRESS_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| format!("failed to install subscriber: {err}"))
}
