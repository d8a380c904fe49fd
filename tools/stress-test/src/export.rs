//! Order set persistence
//!
//! Serializes order collections to pretty JSON arrays (2-space indent,
//! field order as declared on `Order`) and reads them back. Callers get a
//! status rather than an error: I/O problems never abort a run.

use crate::errors::ExportError;
use std::fs;
use std::path::Path;
use types::order::Order;

/// Export order set as pretty JSON.
pub fn export_json(orders: &[Order]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(orders)?)
}

/// Write orders to `path`, creating parent directories.
pub fn write_orders(path: impl AsRef<Path>, orders: &[Order]) -> Result<usize, ExportError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, export_json(orders)?)?;
    Ok(orders.len())
}

/// Write orders and report success.
pub fn save_orders(path: impl AsRef<Path>, orders: &[Order]) -> bool {
    let path = path.as_ref();
    match write_orders(path, orders) {
        Ok(count) => {
            tracing::info!(path = %path.display(), orders = count, "saved orders");
            true
        }
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "failed to save orders");
            false
        }
    }
}

/// Read an order set from `path`.
pub fn read_orders(path: impl AsRef<Path>) -> Result<Vec<Order>, ExportError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Read an order set, or `None` when the file is missing or malformed.
pub fn load_orders(path: impl AsRef<Path>) -> Option<Vec<Order>> {
    let path = path.as_ref();
    match read_orders(path) {
        Ok(orders) => Some(orders),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "could not load orders");
            None
        }
    }
}
