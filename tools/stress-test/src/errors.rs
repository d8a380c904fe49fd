//! Error types for the stress harness
//!
//! Configuration errors abort a run. Per-order and per-worker errors are
//! counted by the caller and never abort a run on their own.

use std::time::Duration;
use thiserror::Error;
use types::errors::OrderError;

/// Top-level harness error
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Invalid harness or scheduler parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Symbol set must not be empty")]
    EmptySymbolSet,

    #[error("Invalid duration: {0} seconds")]
    InvalidDuration(f64),

    #[error("Invalid rate: {0} orders/second")]
    InvalidRate(u64),

    #[error("Invalid worker count: {0}")]
    InvalidWorkerCount(usize),

    #[error("Invalid probability {probability} for scenario {scenario}")]
    InvalidProbability { scenario: String, probability: f64 },

    #[error("Scenario catalog must not be empty")]
    EmptyCatalog,

    #[error("Invalid range for {field}: {min} > {max}")]
    InvalidRange { field: String, min: String, max: String },

    #[error("Failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse config {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Failure of one concurrent worker
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkerError {
    #[error("Worker {worker} failed: {reason}")]
    Failed { worker: usize, reason: String },

    #[error("Worker {worker} timed out after {timeout:?}")]
    TimedOut { worker: usize, timeout: Duration },

    #[error("Worker {worker} panicked")]
    Panicked { worker: usize },
}

/// Persistence errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
