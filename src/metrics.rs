//! Per-call timing and consumed capacity.

use serde::Serialize;
use std::time::Instant;

/// Metrics captured for a single DynamoDB call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OperationMetrics {
    /// Wall-clock duration of the call in milliseconds.
    pub duration_ms: f64,
    /// Read capacity units consumed, when the service reports them.
    pub consumed_rcu: Option<f64>,
    /// Write capacity units consumed, when the service reports them.
    pub consumed_wcu: Option<f64>,
}

impl OperationMetrics {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }

    pub fn with_capacity(duration_ms: f64, consumed_rcu: Option<f64>, consumed_wcu: Option<f64>) -> Self {
        Self {
            duration_ms,
            consumed_rcu,
            consumed_wcu,
        }
    }

    /// Duration since `start`, in milliseconds.
    pub(crate) fn elapsed_ms(start: Instant) -> f64 {
        start.elapsed().as_secs_f64() * 1000.0
    }
}
