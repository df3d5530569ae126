//! Conditional put item operation.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnConsumedCapacity};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::errors::{LifecycleError, Result, map_sdk_error};
use crate::metrics::OperationMetrics;
use crate::record::MovieItem;
use crate::schema::TableSchema;

/// Placeholder for the partition key name. `Year` is a DynamoDB reserved
/// word, so the attribute is never written into the expression directly.
const PARTITION_KEY_PLACEHOLDER: &str = "#pk";

/// Prepared put_item data.
pub struct PreparedPutItem {
    pub table: String,
    pub item: HashMap<String, AttributeValue>,
    pub condition_expression: String,
    pub expression_attribute_names: HashMap<String, String>,
}

/// Result of a put_item operation.
#[derive(Debug, Clone, Copy)]
pub struct PutItemResult {
    pub metrics: OperationMetrics,
}

/// Prepare put_item: serialize `record` and guard against overwriting its partition key.
pub fn prepare_put_item(table: &str, schema: &TableSchema, record: &MovieItem) -> PreparedPutItem {
    PreparedPutItem {
        table: table.to_string(),
        item: record.to_item(schema),
        condition_expression: format!("attribute_not_exists({})", PARTITION_KEY_PLACEHOLDER),
        expression_attribute_names: HashMap::from([(
            PARTITION_KEY_PLACEHOLDER.to_string(),
            schema.partition_key.name.clone(),
        )]),
    }
}

/// Core async put_item operation.
pub async fn execute_put_item(client: &Client, prepared: PreparedPutItem) -> Result<PutItemResult> {
    let request = client
        .put_item()
        .table_name(&prepared.table)
        .set_item(Some(prepared.item))
        .condition_expression(prepared.condition_expression)
        .set_expression_attribute_names(Some(prepared.expression_attribute_names))
        .return_consumed_capacity(ReturnConsumedCapacity::Total);

    let start = Instant::now();
    let result = request.send().await;
    let duration_ms = OperationMetrics::elapsed_ms(start);

    match result {
        Ok(output) => {
            let consumed_wcu = output.consumed_capacity().and_then(|c| c.capacity_units());
            let metrics = OperationMetrics::with_capacity(duration_ms, None, consumed_wcu);
            info!(table = %prepared.table, duration_ms, ?consumed_wcu, "put_item succeeded");
            Ok(PutItemResult { metrics })
        }
        Err(e) => {
            debug!(table = %prepared.table, error = ?e, "put_item failed");
            match e.as_service_error() {
                Some(PutItemError::ConditionalCheckFailedException(_)) => {
                    Err(LifecycleError::ConditionalCheckFailed {
                        table: prepared.table,
                    })
                }
                Some(PutItemError::ResourceNotFoundException(_)) => Err(LifecycleError::TableNotFound {
                    table: prepared.table,
                }),
                _ => Err(map_sdk_error(e, Some(&prepared.table))),
            }
        }
    }
}

/// Sync put_item - blocks until complete.
pub fn sync_put_item(
    client: &Client,
    runtime: &Arc<Runtime>,
    table: &str,
    schema: &TableSchema,
    record: &MovieItem,
) -> Result<PutItemResult> {
    let prepared = prepare_put_item(table, schema, record);
    runtime.block_on(execute_put_item(client, prepared))
}
