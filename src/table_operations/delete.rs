//! Delete table operation.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::operation::delete_table::DeleteTableError;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::info;

use crate::errors::{LifecycleError, Result, map_sdk_error};
use crate::metrics::OperationMetrics;

/// Core async delete_table operation.
pub async fn execute_delete_table(client: &Client, table: &str) -> Result<OperationMetrics> {
    let start = Instant::now();
    let result = client.delete_table().table_name(table).send().await;
    let metrics = OperationMetrics::new(OperationMetrics::elapsed_ms(start));

    match result {
        Ok(_) => {
            info!(table, duration_ms = metrics.duration_ms, "delete_table accepted");
            Ok(metrics)
        }
        Err(e) => match e.as_service_error() {
            Some(DeleteTableError::ResourceNotFoundException(_)) => Err(LifecycleError::TableNotFound {
                table: table.to_string(),
            }),
            // Deleting a table that is still CREATING.
            Some(DeleteTableError::ResourceInUseException(_)) => Err(LifecycleError::TableInUse {
                table: table.to_string(),
            }),
            _ => Err(map_sdk_error(e, Some(table))),
        },
    }
}

/// Sync delete_table - blocks until complete.
pub fn sync_delete_table(client: &Client, runtime: &Arc<Runtime>, table: &str) -> Result<OperationMetrics> {
    runtime.block_on(execute_delete_table(client, table))
}
