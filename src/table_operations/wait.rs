//! Wait for a table to reach a state.
//!
//! Polls DescribeTable with the bounded exponential backoff of a [`WaitPolicy`].

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::TableStatus;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::config::WaitPolicy;
use crate::errors::{LifecycleError, Result, TableState, map_sdk_error};

/// Current status of `table`, or `None` if it does not exist.
async fn describe_status(client: &Client, table: &str) -> Result<Option<TableStatus>> {
    match client.describe_table().table_name(table).send().await {
        Ok(output) => Ok(output
            .table()
            .and_then(|t| t.table_status())
            .cloned()),
        Err(e) => match e.as_service_error() {
            Some(DescribeTableError::ResourceNotFoundException(_)) => Ok(None),
            _ => Err(map_sdk_error(e, Some(table))),
        },
    }
}

async fn poll_until<F>(
    client: &Client,
    table: &str,
    policy: &WaitPolicy,
    state: TableState,
    mut reached: F,
) -> Result<()>
where
    F: FnMut(Option<&TableStatus>) -> Result<bool>,
{
    for attempt in 0..policy.max_attempts {
        let status = describe_status(client, table).await?;
        debug!(table, attempt, ?status, %state, "polled table status");

        if reached(status.as_ref())? {
            info!(table, attempts = attempt + 1, %state, "table reached state");
            return Ok(());
        }

        if attempt + 1 < policy.max_attempts {
            tokio::time::sleep(policy.delay_for(attempt)).await;
        }
    }

    Err(LifecycleError::WaitTimeout {
        table: table.to_string(),
        state,
        attempts: policy.max_attempts,
    })
}

/// Wait until `table` reports ACTIVE.
///
/// Fails immediately if the table does not exist.
pub async fn wait_for_table_active(client: &Client, table: &str, policy: &WaitPolicy) -> Result<()> {
    poll_until(client, table, policy, TableState::Active, |status| match status {
        Some(TableStatus::Active) => Ok(true),
        Some(_) => Ok(false),
        None => Err(LifecycleError::TableNotFound {
            table: table.to_string(),
        }),
    })
    .await
}

/// Wait until DescribeTable no longer finds `table`.
pub async fn wait_for_table_deleted(client: &Client, table: &str, policy: &WaitPolicy) -> Result<()> {
    poll_until(client, table, policy, TableState::Deleted, |status| {
        Ok(status.is_none())
    })
    .await
}

pub fn sync_wait_for_table_active(
    client: &Client,
    runtime: &Arc<Runtime>,
    table: &str,
    policy: &WaitPolicy,
) -> Result<()> {
    runtime.block_on(wait_for_table_active(client, table, policy))
}

pub fn sync_wait_for_table_deleted(
    client: &Client,
    runtime: &Arc<Runtime>,
    table: &str,
    policy: &WaitPolicy,
) -> Result<()> {
    runtime.block_on(wait_for_table_deleted(client, table, policy))
}
