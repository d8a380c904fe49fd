//! Stress orchestrator
//!
//! Owns the factory, catalog and RNG for a harness session and runs the
//! named test scenarios, handing each resulting order set to analysis.
//! Configuration errors abort a run; per-order and per-worker errors are
//! counted into the run result and into a session-wide total.

use crate::config::HarnessConfig;
use crate::errors::{ConfigError, HarnessError};
use crate::export;
use crate::factory::{rng_for, OrderFactory};
use crate::metrics::{analyze, PerformanceReport};
use crate::runner::ConcurrentRunner;
use crate::scenarios::market_stress;
use crate::scenarios::ScenarioCatalog;
use crate::scheduler::{BurstConfig, RateScheduler};
use chrono::{DateTime, Utc};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use types::order::Order;

/// File holding every order of an "all" session.
pub const COMBINED_FILE_NAME: &str = "stress_test_combined.json";
/// File holding the fallback burst.
pub const FALLBACK_FILE_NAME: &str = "stress_test_orders.json";

/// RNG stream reserved for the orchestrator; worker streams count up from 0.
const ORCHESTRATOR_STREAM: u64 = u64::MAX;

/// Named test scenarios, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TestScenario {
    QuickTest,
    HighFrequencySimulation,
    MarketStressTest,
    ConcurrentLoadTest,
}

impl TestScenario {
    pub const ALL: [TestScenario; 4] = [
        TestScenario::QuickTest,
        TestScenario::HighFrequencySimulation,
        TestScenario::MarketStressTest,
        TestScenario::ConcurrentLoadTest,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            TestScenario::QuickTest => "Quick Test",
            TestScenario::HighFrequencySimulation => "High Frequency Simulation",
            TestScenario::MarketStressTest => "Market Stress Test",
            TestScenario::ConcurrentLoadTest => "Concurrent Load Test",
        }
    }

    /// 1-based menu position.
    pub fn from_menu_number(number: usize) -> Option<Self> {
        number.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn file_name(&self) -> String {
        file_name_for(self.display_name())
    }
}

impl fmt::Display for TestScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// `stress_test_<name lower-cased, spaces as underscores>.json`
pub fn file_name_for(display_name: &str) -> String {
    format!("stress_test_{}.json", display_name.to_lowercase().replace(' ', "_"))
}

/// Parsed menu choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Single(TestScenario),
    All,
    /// Unrecognised input; runs the default burst
    Fallback,
}

impl Selection {
    pub fn parse(input: &str) -> Self {
        let choice = input.trim().to_lowercase();
        if choice == "all" {
            return Selection::All;
        }
        choice
            .parse::<usize>()
            .ok()
            .and_then(TestScenario::from_menu_number)
            .map_or(Selection::Fallback, Selection::Single)
    }
}

/// Aggregate figures of one scenario run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub scenario: String,
    pub started_at: DateTime<Utc>,
    pub total_orders: usize,
    pub total_time_secs: f64,
    pub orders_per_second: f64,
    pub error_count: u64,
}

impl RunResult {
    fn new(scenario: &str, started_at: DateTime<Utc>, total_orders: usize, elapsed: Duration, error_count: u64) -> Self {
        let total_time_secs = elapsed.as_secs_f64();
        let orders_per_second = if total_time_secs > 0.0 {
            total_orders as f64 / total_time_secs
        } else {
            0.0
        };
        Self {
            scenario: scenario.to_string(),
            started_at,
            total_orders,
            total_time_secs,
            orders_per_second,
            error_count,
        }
    }
}

/// Orders, figures and analysis of one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    /// `None` for the fallback burst
    pub scenario: Option<TestScenario>,
    pub orders: Vec<Order>,
    pub result: RunResult,
    pub report: PerformanceReport,
}

impl ScenarioRun {
    pub fn file_name(&self) -> String {
        self.scenario
            .map_or_else(|| FALLBACK_FILE_NAME.to_string(), |s| s.file_name())
    }
}

/// Runs of one session, in execution order.
#[derive(Debug, Clone, Default)]
pub struct StressRun {
    pub runs: Vec<ScenarioRun>,
}

impl StressRun {
    pub fn total_orders(&self) -> usize {
        self.runs.iter().map(|r| r.orders.len()).sum()
    }

    pub fn error_count(&self) -> u64 {
        self.runs.iter().map(|r| r.result.error_count).sum()
    }

    /// All orders, concatenated in run order.
    pub fn combined_orders(&self) -> Vec<Order> {
        self.runs.iter().flat_map(|r| r.orders.iter().cloned()).collect()
    }
}

/// Top-level driver.
pub struct StressOrchestrator {
    config: HarnessConfig,
    factory: Arc<OrderFactory>,
    catalog: ScenarioCatalog,
    runner: ConcurrentRunner,
    rng: ChaCha8Rng,
    total_errors: u64,
}

impl StressOrchestrator {
    pub fn new(config: HarnessConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let factory = Arc::new(config.build_factory()?);
        let catalog = config.build_catalog()?;
        let runner = ConcurrentRunner::new(Arc::clone(&factory))
            .with_timeout(config.worker_timeout())
            .with_seed(config.seed);
        let rng = rng_for(config.seed, ORCHESTRATOR_STREAM);

        Ok(Self {
            config,
            factory,
            catalog,
            runner,
            rng,
            total_errors: 0,
        })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn factory(&self) -> &Arc<OrderFactory> {
        &self.factory
    }

    /// Errors counted across every run of this session.
    pub fn total_errors(&self) -> u64 {
        self.total_errors
    }

    /// Run a named scenario.
    pub fn run(&mut self, scenario: TestScenario) -> Result<ScenarioRun, HarnessError> {
        tracing::info!(scenario = %scenario, "running scenario");
        let started_at = Utc::now();
        let start = Instant::now();

        let (orders, elapsed, errors) = match scenario {
            TestScenario::QuickTest => {
                let burst = self.config.quick_test.clone();
                let orders = self.burst(&burst)?;
                (orders, start.elapsed(), 0)
            }
            TestScenario::HighFrequencySimulation => {
                let mut scheduler = RateScheduler::new(&self.factory);
                let paced = scheduler.paced(&self.config.high_frequency, &mut self.rng)?;
                (paced.orders, paced.elapsed, 0)
            }
            TestScenario::MarketStressTest => {
                let stress = market_stress::run(
                    &self.factory,
                    &self.catalog,
                    &self.config.market_stress,
                    &mut self.rng,
                );
                (stress.orders, start.elapsed(), stress.error_count)
            }
            TestScenario::ConcurrentLoadTest => {
                let concurrent = &self.config.concurrent;
                let output = self.runner.run(concurrent.workers, concurrent.orders_per_worker)?;
                let elapsed = output.elapsed;
                (output.orders, elapsed, output.error_count)
            }
        };

        Ok(self.finish(Some(scenario), scenario.display_name(), started_at, orders, elapsed, errors))
    }

    /// Run the default burst used for unrecognised selections.
    pub fn run_fallback(&mut self) -> Result<ScenarioRun, HarnessError> {
        tracing::info!("running default burst");
        let started_at = Utc::now();
        let start = Instant::now();
        let burst = self.config.fallback.clone();
        let orders = self.burst(&burst)?;
        Ok(self.finish(None, "Default Burst", started_at, orders, start.elapsed(), 0))
    }

    /// Run every named scenario in menu order.
    pub fn run_all(&mut self) -> Result<StressRun, HarnessError> {
        let mut session = StressRun::default();
        for scenario in TestScenario::ALL {
            session.runs.push(self.run(scenario)?);
        }
        Ok(session)
    }

    pub fn run_selection(&mut self, selection: Selection) -> Result<StressRun, HarnessError> {
        match selection {
            Selection::All => self.run_all(),
            Selection::Single(scenario) => Ok(StressRun {
                runs: vec![self.run(scenario)?],
            }),
            Selection::Fallback => Ok(StressRun {
                runs: vec![self.run_fallback()?],
            }),
        }
    }

    /// Path a run's orders are written to.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.config.output_dir.join(file_name)
    }

    /// Save each run to its own file, plus the combined file when the
    /// session ran every scenario. Returns the number of failed writes.
    pub fn save_session(&self, session: &StressRun, include_combined: bool) -> usize {
        let mut failures = 0;
        for run in &session.runs {
            if !export::save_orders(self.output_path(&run.file_name()), &run.orders) {
                failures += 1;
            }
        }
        if include_combined
            && !export::save_orders(self.output_path(COMBINED_FILE_NAME), &session.combined_orders())
        {
            failures += 1;
        }
        failures
    }

    fn burst(&mut self, config: &BurstConfig) -> Result<Vec<Order>, ConfigError> {
        RateScheduler::new(&self.factory).burst(config, &mut self.rng)
    }

    fn finish(
        &mut self,
        scenario: Option<TestScenario>,
        name: &str,
        started_at: DateTime<Utc>,
        orders: Vec<Order>,
        elapsed: Duration,
        errors: u64,
    ) -> ScenarioRun {
        self.total_errors += errors;
        let result = RunResult::new(name, started_at, orders.len(), elapsed, errors);
        let report = analyze(&orders, result.total_time_secs, errors);

        tracing::info!(
            scenario = name,
            orders = result.total_orders,
            errors,
            orders_per_second = result.orders_per_second,
            "scenario finished"
        );

        ScenarioRun {
            scenario,
            orders,
            result,
            report,
        }
    }
}
