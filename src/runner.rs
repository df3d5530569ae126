//! Table lifecycle runner.
//!
//! Drives one run: create the table, list tables, put the configured records,
//! delete the table, list tables again. Human-readable lines go to the
//! runner's writer (stdout in the binary); diagnostics go through `tracing`.
//!
//! List, create, delete and wait failures end the run and are returned to the
//! caller. Put failures are reported and recorded, and the run continues.

use aws_sdk_dynamodb::Client;
use std::io::Write;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{info, instrument, warn};

use crate::basic_operations::sync_put_item;
use crate::client::build_client;
use crate::config::RunnerConfig;
use crate::errors::{LifecycleError, Result};
use crate::metrics::OperationMetrics;
use crate::record::MovieItem;
use crate::schema::TableSchema;
use crate::table_operations::{
    sync_create_table, sync_delete_table, sync_list_tables, sync_wait_for_table_active,
    sync_wait_for_table_deleted,
};

/// Outcome of one put in a run.
#[derive(Debug)]
pub struct PutOutcome {
    pub record: MovieItem,
    pub result: Result<OperationMetrics>,
}

impl PutOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// What a completed run observed.
#[derive(Debug)]
pub struct RunReport {
    pub table: String,
    pub tables_after_create: Vec<String>,
    pub puts: Vec<PutOutcome>,
    pub tables_after_delete: Vec<String>,
}

impl RunReport {
    /// The table showed up in the listing taken after create.
    pub fn table_was_listed(&self) -> bool {
        self.tables_after_create.iter().any(|t| t == &self.table)
    }

    /// The table was absent from the listing taken after delete.
    pub fn table_was_removed(&self) -> bool {
        !self.tables_after_delete.iter().any(|t| t == &self.table)
    }

    pub fn failed_puts(&self) -> impl Iterator<Item = &PutOutcome> {
        self.puts.iter().filter(|p| !p.succeeded())
    }
}

/// Runs the create / list / put / delete / list sequence against one client.
pub struct TableLifecycleRunner<W: Write> {
    client: Client,
    runtime: Arc<Runtime>,
    config: RunnerConfig,
    out: W,
}

impl<W: Write> TableLifecycleRunner<W> {
    /// Wrap an existing client.
    pub fn new(client: Client, runtime: Arc<Runtime>, config: RunnerConfig, out: W) -> Self {
        Self {
            client,
            runtime,
            config,
            out,
        }
    }

    /// Build a client from `config.client` and wrap it.
    pub fn connect(config: RunnerConfig, runtime: Arc<Runtime>, out: W) -> Result<Self> {
        let client = runtime.block_on(build_client(&config.client))?;
        Ok(Self::new(client, runtime, config, out))
    }

    pub fn with_schema(mut self, schema: TableSchema) -> Self {
        self.config.schema = schema;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// List up to `limit` table names and print them under a `Tables:` header.
    pub fn list_tables(&mut self, limit: u32) -> Result<Vec<String>> {
        let names = sync_list_tables(&self.client, &self.runtime, limit)?;
        writeln!(self.out, "Tables:")?;
        for name in &names {
            writeln!(self.out, "{}", name)?;
        }
        Ok(names)
    }

    /// Create `name` with `schema`. Returns once the create call is accepted.
    pub fn create_table(&mut self, schema: &TableSchema, name: &str) -> Result<()> {
        sync_create_table(&self.client, &self.runtime, name, schema)?;
        writeln!(self.out, "Created the table {}", name)?;
        Ok(())
    }

    /// Conditionally put `record` into `name`.
    ///
    /// The error is returned to the caller instead of ending the run; a
    /// repeated key fails with `ConditionalCheckFailed`.
    pub fn put_item(&mut self, record: &MovieItem, name: &str) -> Result<OperationMetrics> {
        let result = sync_put_item(&self.client, &self.runtime, name, &self.config.schema, record)
            .map(|r| r.metrics);
        match &result {
            Ok(_) => writeln!(self.out, "Added movie {} to table {}", record, name)?,
            Err(e) => {
                warn!(table = name, movie = %record, error = %e, "put_item rejected");
                writeln!(self.out, "Could not add movie {}: {}", record, e)?;
            }
        }
        result
    }

    pub fn delete_table(&mut self, name: &str) -> Result<()> {
        sync_delete_table(&self.client, &self.runtime, name)?;
        writeln!(self.out, "Deleted the table {}", name)?;
        Ok(())
    }

    fn wait_for_active(&self, name: &str) -> Result<()> {
        match &self.config.wait {
            Some(policy) => sync_wait_for_table_active(&self.client, &self.runtime, name, policy),
            None => Ok(()),
        }
    }

    fn wait_for_deleted(&self, name: &str) -> Result<()> {
        match &self.config.wait {
            Some(policy) => sync_wait_for_table_deleted(&self.client, &self.runtime, name, policy),
            None => Ok(()),
        }
    }

    /// Execute the full lifecycle.
    ///
    /// The configuration is validated before any call, so a bad setting never
    /// leaves a created table behind.
    #[instrument(skip(self), fields(table = %self.config.table_name))]
    pub fn run(&mut self) -> Result<RunReport> {
        self.config.validate()?;

        let table = self.config.table_name.clone();
        let limit = self.config.list_limit;
        let schema = self.config.schema.clone();
        let records = self.config.records.clone();

        self.create_table(&schema, &table)?;
        self.wait_for_active(&table)?;
        let tables_after_create = self.list_tables(limit)?;

        let mut puts = Vec::with_capacity(records.len());
        for record in records {
            let result = self.put_item(&record, &table);
            if let Err(e) = &result {
                if !e.is_conditional_check_failed() {
                    warn!(error = %e, "unexpected put failure");
                }
            }
            puts.push(PutOutcome { record, result });
        }

        writeln!(self.out)?;

        self.delete_table(&table)?;
        self.wait_for_deleted(&table)?;
        let tables_after_delete = self.list_tables(limit)?;

        let report = RunReport {
            table,
            tables_after_create,
            puts,
            tables_after_delete,
        };
        info!(
            listed = report.table_was_listed(),
            removed = report.table_was_removed(),
            failed_puts = report.failed_puts().count(),
            "lifecycle run finished"
        );
        Ok(report)
    }
}

/// Exit code for a finished run: 0 on success, 1 on a propagated error.
///
/// Put failures are part of a successful run.
pub fn exit_code(result: &std::result::Result<RunReport, LifecycleError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
