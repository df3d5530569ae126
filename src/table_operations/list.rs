//! List tables operation.

use aws_sdk_dynamodb::Client;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::config::MAX_LIST_LIMIT;
use crate::errors::{LifecycleError, Result, map_sdk_error};
use crate::metrics::OperationMetrics;

/// Validate a requested limit and clamp it to what ListTables accepts.
pub fn effective_limit(limit: u32) -> Result<i32> {
    if limit == 0 {
        return Err(LifecycleError::Validation(
            "list limit must be at least 1".to_string(),
        ));
    }
    Ok(limit.min(MAX_LIST_LIMIT) as i32)
}

/// Core async list_tables operation.
///
/// Returns at most `limit` names, in the order the service returned them,
/// even if the endpoint ignores `Limit`.
pub async fn execute_list_tables(client: &Client, limit: u32) -> Result<(Vec<String>, OperationMetrics)> {
    let limit = effective_limit(limit)?;

    let start = Instant::now();
    let output = client
        .list_tables()
        .limit(limit)
        .send()
        .await
        .map_err(|e| map_sdk_error(e, None))?;
    let metrics = OperationMetrics::new(OperationMetrics::elapsed_ms(start));

    let names: Vec<String> = output
        .table_names()
        .iter()
        .take(limit as usize)
        .cloned()
        .collect();

    debug!(count = names.len(), duration_ms = metrics.duration_ms, "listed tables");
    Ok((names, metrics))
}

/// Sync list_tables - blocks until complete.
pub fn sync_list_tables(client: &Client, runtime: &Arc<Runtime>, limit: u32) -> Result<Vec<String>> {
    runtime
        .block_on(execute_list_tables(client, limit))
        .map(|(names, _)| names)
}
