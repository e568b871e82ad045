//! Metrics for the ledger.

use crate::errors::LedgerError;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter_vec, Encoder, Histogram, HistogramOpts,
    IntCounterVec, TextEncoder,
};

lazy_static! {
    /// Counter for operations that were committed, by kind.
    pub static ref OPERATIONS_APPLIED: IntCounterVec = register_int_counter_vec!(
        "ledger_operations_applied_total",
        "Total number of ledger operations applied",
        &["operation"]
    )
    .unwrap();

    /// Counter for operations that were rejected, by kind and reason.
    pub static ref OPERATIONS_REJECTED: IntCounterVec = register_int_counter_vec!(
        "ledger_operations_rejected_total",
        "Total number of ledger operations rejected",
        &["operation", "reason"]
    )
    .unwrap();

    /// Histogram for operation processing time, lock wait included.
    pub static ref OPERATION_TIME: Histogram = register_histogram!(
        HistogramOpts::new(
            "ledger_operation_time_seconds",
            "Time to apply a ledger operation"
        )
        .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 1.0])
    )
    .unwrap();
}

/// Records the result of one operation.
pub fn observe<T>(operation: &str, result: &Result<T, LedgerError>) {
    match result {
        Ok(_) => OPERATIONS_APPLIED.with_label_values(&[operation]).inc(),
        Err(e) => OPERATIONS_REJECTED
            .with_label_values(&[operation, e.reason()])
            .inc(),
    }
}

/// Renders every registered metric in the Prometheus text format.
pub fn gather_text() -> Result<String, LedgerError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| LedgerError::Serialization(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| LedgerError::Serialization(e.to_string()))
}
