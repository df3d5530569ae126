//! Table management operations for DynamoDB.
//!
//! This module provides table lifecycle operations:
//! - `list` - List table names, capped at a limit
//! - `create` - Create a table from a `TableSchema`
//! - `delete` - Delete a table
//! - `wait` - Wait for a table to become active or to disappear

mod create;
mod delete;
mod list;
mod wait;

pub use create::{CreateTableResult, execute_create_table, sync_create_table};
pub use delete::{execute_delete_table, sync_delete_table};
pub use list::{effective_limit, execute_list_tables, sync_list_tables};
pub use wait::{
    sync_wait_for_table_active, sync_wait_for_table_deleted, wait_for_table_active,
    wait_for_table_deleted,
};
