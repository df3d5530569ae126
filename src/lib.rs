//! Table lifecycle runner for DynamoDB.
//!
//! Creates a table, lists tables, puts records with a conditional write,
//! deletes the table and lists again, against a local emulator by default.
//!
//! ```no_run
//! use std::sync::Arc;
//! use dynamo_lifecycle::{RunnerConfig, TableLifecycleRunner};
//!
//! let runtime = Arc::new(tokio::runtime::Runtime::new()?);
//! let mut runner = TableLifecycleRunner::connect(RunnerConfig::default(), runtime, std::io::stdout())?;
//! let report = runner.run()?;
//! assert!(report.table_was_removed());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod basic_operations;
pub mod client;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod record;
pub mod runner;
pub mod schema;
pub mod table_operations;

pub use client::build_client;
pub use config::{ClientSettings, RunnerConfig, StaticCredentials, WaitPolicy};
pub use errors::{LifecycleError, Result};
pub use metrics::OperationMetrics;
pub use record::MovieItem;
pub use runner::{PutOutcome, RunReport, TableLifecycleRunner, exit_code};
pub use schema::{KeyAttribute, ScalarType, TableSchema};
