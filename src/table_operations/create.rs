//! Create table operation.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::types::TableStatus;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::errors::{LifecycleError, Result, map_sdk_error};
use crate::metrics::OperationMetrics;
use crate::schema::TableSchema;

/// Result of a create_table call.
///
/// The control-plane call returns as soon as the table is accepted; `status`
/// is usually `CREATING`.
#[derive(Debug, Clone)]
pub struct CreateTableResult {
    pub status: Option<TableStatus>,
    pub metrics: OperationMetrics,
}

/// Core async create_table operation.
pub async fn execute_create_table(
    client: &Client,
    table: &str,
    schema: &TableSchema,
) -> Result<CreateTableResult> {
    schema.validate()?;

    let request = client
        .create_table()
        .table_name(table)
        .set_attribute_definitions(Some(schema.attribute_definitions()?))
        .set_key_schema(Some(schema.key_schema()?))
        .provisioned_throughput(schema.provisioned_throughput()?);

    let start = Instant::now();
    let result = request.send().await;
    let metrics = OperationMetrics::new(OperationMetrics::elapsed_ms(start));

    match result {
        Ok(output) => {
            let status = output
                .table_description()
                .and_then(|d| d.table_status())
                .cloned();
            info!(table, ?status, duration_ms = metrics.duration_ms, "create_table accepted");
            Ok(CreateTableResult { status, metrics })
        }
        Err(e) => {
            debug!(table, error = ?e, "create_table failed");
            if let Some(CreateTableError::ResourceInUseException(_)) = e.as_service_error() {
                return Err(LifecycleError::TableInUse {
                    table: table.to_string(),
                });
            }
            Err(map_sdk_error(e, Some(table)))
        }
    }
}

/// Sync create_table - blocks until the control-plane call returns.
///
/// Does not wait for the table to become ACTIVE; see `wait_for_table_active`.
pub fn sync_create_table(
    client: &Client,
    runtime: &Arc<Runtime>,
    table: &str,
    schema: &TableSchema,
) -> Result<CreateTableResult> {
    runtime.block_on(execute_create_table(client, table, schema))
}
