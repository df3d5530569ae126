//! Run configuration.
//!
//! Everything a run needs (endpoint, region, credentials, table name, records)
//! lives in [`RunnerConfig`]. Defaults target a LocalStack emulator; nothing
//! is read from or written to the process environment here.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{LifecycleError, Result};
use crate::record::MovieItem;
use crate::schema::TableSchema;

/// LocalStack edge endpoint.
pub const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";
pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_TABLE_NAME: &str = "Movies";
pub const DEFAULT_LIST_LIMIT: u32 = 5;
/// Largest `Limit` ListTables accepts.
pub const MAX_LIST_LIMIT: u32 = 100;

/// Static access key pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCredentials {
    pub access_key_id: String,
    #[serde(skip_serializing)]
    pub secret_access_key: String,
    #[serde(skip_serializing, default)]
    pub session_token: Option<String>,
}

impl StaticCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Placeholder pair accepted by local emulators.
    pub fn placeholder() -> Self {
        Self::new("test", "test")
    }
}

/// How to reach DynamoDB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// `None` falls back to the default region chain, then `us-east-1`.
    pub region: Option<String>,
    /// `None` uses the SDK's standard endpoint resolution.
    pub endpoint_url: Option<String>,
    /// `None` uses the default credential chain.
    pub credentials: Option<StaticCredentials>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            region: Some(DEFAULT_REGION.to_string()),
            endpoint_url: Some(LOCALSTACK_ENDPOINT.to_string()),
            credentials: Some(StaticCredentials::placeholder()),
        }
    }
}

/// Bounded exponential backoff for table state polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl WaitPolicy {
    /// Delay before poll number `attempt` (0-based): doubles each time, capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            max_attempts: 20,
        }
    }
}

/// Full configuration of one lifecycle run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub client: ClientSettings,
    pub table_name: String,
    pub schema: TableSchema,
    pub list_limit: u32,
    /// Records put (in order) between create and delete. Empty skips the put phase.
    pub records: Vec<MovieItem>,
    /// `None` skips waiting for ACTIVE after create and for removal after delete.
    pub wait: Option<WaitPolicy>,
}

impl RunnerConfig {
    /// Two puts of the same movie: the second one exercises the conditional-write guard.
    pub fn default_records() -> Vec<MovieItem> {
        let movie = MovieItem::new(2022, "Dawn of Ice");
        vec![movie.clone(), movie]
    }

    /// Reject settings that would only fail after the table exists.
    pub fn validate(&self) -> Result<()> {
        if self.table_name.is_empty() {
            return Err(LifecycleError::Validation(
                "table name must not be empty".to_string(),
            ));
        }
        if self.list_limit == 0 {
            return Err(LifecycleError::Validation(
                "list limit must be at least 1".to_string(),
            ));
        }
        if let Some(policy) = &self.wait {
            if policy.max_attempts == 0 {
                return Err(LifecycleError::Validation(
                    "wait policy needs at least 1 attempt".to_string(),
                ));
            }
        }
        self.schema.validate()
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            client: ClientSettings::default(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            schema: TableSchema::movies(),
            list_limit: DEFAULT_LIST_LIMIT,
            records: Self::default_records(),
            wait: Some(WaitPolicy::default()),
        }
    }
}
