use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dynamo_lifecycle::config::{DEFAULT_LIST_LIMIT, DEFAULT_REGION, DEFAULT_TABLE_NAME, LOCALSTACK_ENDPOINT};
use dynamo_lifecycle::{
    ClientSettings, RunnerConfig, StaticCredentials, TableLifecycleRunner, TableSchema, WaitPolicy,
    exit_code,
};
use tokio::runtime::Runtime;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Create, list, fill and delete a DynamoDB table against a local emulator
#[derive(Parser, Debug)]
#[command(name = "dynamo-lifecycle")]
#[command(version, about, long_about = None)]
struct Cli {
    /// DynamoDB endpoint URL
    #[arg(long, default_value = LOCALSTACK_ENDPOINT, env = "DYNAMO_LIFECYCLE_ENDPOINT")]
    endpoint_url: String,

    /// Ignore --endpoint-url and use the SDK's standard endpoint resolution
    #[arg(long)]
    aws_endpoint: bool,

    /// AWS region
    #[arg(long, default_value = DEFAULT_REGION, env = "DYNAMO_LIFECYCLE_REGION")]
    region: String,

    /// Access key ID (emulators accept any value)
    #[arg(long, default_value = "test", env = "DYNAMO_LIFECYCLE_ACCESS_KEY_ID")]
    access_key_id: String,

    /// Secret access key (emulators accept any value)
    #[arg(long, default_value = "test", env = "DYNAMO_LIFECYCLE_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: String,

    /// Use the default credential chain instead of the static key pair
    #[arg(long)]
    default_credentials: bool,

    /// Name of the table to create and delete
    #[arg(long, short, default_value = DEFAULT_TABLE_NAME, env = "DYNAMO_LIFECYCLE_TABLE")]
    table_name: String,

    /// Partition key attribute name
    #[arg(long, default_value = "Year")]
    partition_key: String,

    /// Maximum number of table names to list
    #[arg(long, short, default_value_t = DEFAULT_LIST_LIMIT)]
    limit: u32,

    /// Skip the put phase
    #[arg(long)]
    skip_put: bool,

    /// Do not wait for the table to become ACTIVE or to disappear
    #[arg(long)]
    no_wait: bool,

    /// Maximum DescribeTable polls per wait
    #[arg(long, default_value_t = 20)]
    wait_attempts: u32,

    /// Initial delay between polls, in milliseconds
    #[arg(long, default_value_t = 200)]
    wait_initial_ms: u64,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn runner_config(&self) -> RunnerConfig {
        let client = ClientSettings {
            region: Some(self.region.clone()),
            endpoint_url: (!self.aws_endpoint).then(|| self.endpoint_url.clone()),
            credentials: (!self.default_credentials).then(|| {
                StaticCredentials::new(&self.access_key_id, &self.secret_access_key)
            }),
        };

        let wait = (!self.no_wait).then(|| WaitPolicy {
            initial_delay: Duration::from_millis(self.wait_initial_ms),
            max_attempts: self.wait_attempts,
            ..WaitPolicy::default()
        });

        RunnerConfig {
            client,
            table_name: self.table_name.clone(),
            schema: TableSchema::movies().with_partition_key(&self.partition_key),
            list_limit: self.limit,
            records: if self.skip_put {
                Vec::new()
            } else {
                RunnerConfig::default_records()
            },
            wait,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Diagnostics on stderr; stdout carries the run's output.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "dynamo_lifecycle=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<u8> {
    let config = cli.runner_config();

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(0);
    }

    let runtime = Arc::new(Runtime::new().context("failed to create tokio runtime")?);
    let mut runner = TableLifecycleRunner::connect(config, runtime, io::stdout())
        .context("failed to create DynamoDB client")?;

    let result = runner.run();
    match &result {
        Ok(report) if !report.table_was_removed() => {
            tracing::warn!(table = %report.table, "table still listed after delete");
        }
        Ok(_) => {}
        Err(err) => eprintln!("Error: lifecycle run on table '{}' failed: {err}", cli.table_name),
    }
    Ok(exit_code(&result))
}
