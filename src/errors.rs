//! Error types for dynamo-lifecycle.
//!
//! This module maps AWS SDK errors to [`LifecycleError`].
//! Uses typed `SdkError` variant matching and `ProvideErrorMetadata` codes,
//! no string parsing of debug output.

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Table state a wait loop was polling for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    Active,
    Deleted,
}

impl std::fmt::Display for TableState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableState::Active => f.write_str("ACTIVE"),
            TableState::Deleted => f.write_str("deleted"),
        }
    }
}

/// Everything that can go wrong during a lifecycle run.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("connection to DynamoDB failed: {0}")]
    Connection(String),

    #[error("invalid AWS credentials: {0}")]
    Credentials(String),

    #[error("access denied to DynamoDB: {0}")]
    AccessDenied(String),

    #[error("DynamoDB request rate too high: {0}")]
    Throttled(String),

    #[error("table '{table}' not found")]
    TableNotFound { table: String },

    #[error("table '{table}' is in use")]
    TableInUse { table: String },

    #[error("the condition expression evaluated to false on table '{table}'")]
    ConditionalCheckFailed { table: String },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("table '{table}' did not become {state} after {attempts} attempts")]
    WaitTimeout {
        table: String,
        state: TableState,
        attempts: u32,
    },

    #[error("failed to build request: {0}")]
    Request(String),

    #[error("DynamoDB returned {code}: {message}")]
    Service { code: String, message: String },

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl LifecycleError {
    /// True for the one put failure the runner expects: a rejected conditional write.
    pub fn is_conditional_check_failed(&self) -> bool {
        matches!(self, LifecycleError::ConditionalCheckFailed { .. })
    }

    pub fn is_table_not_found(&self) -> bool {
        matches!(self, LifecycleError::TableNotFound { .. })
    }
}

impl From<aws_sdk_dynamodb::error::BuildError> for LifecycleError {
    fn from(err: aws_sdk_dynamodb::error::BuildError) -> Self {
        LifecycleError::Validation(err.to_string())
    }
}

// ========== TYPED ERROR MAPPING ==========

/// Map non-service `SdkError` variants (dispatch failures, timeouts, etc.).
///
/// Returns `Some(err)` for non-service errors, `None` for `ServiceError`.
fn map_outer_sdk_error<E, R>(err: &SdkError<E, R>) -> Option<LifecycleError>
where
    E: std::fmt::Debug,
    R: std::fmt::Debug,
{
    match err {
        SdkError::DispatchFailure(dispatch) => {
            let msg = if dispatch.is_timeout() {
                "connection timed out, check your network or endpoint"
            } else if dispatch.is_io() {
                "I/O error, check if the endpoint is reachable"
            } else {
                "check if the endpoint is reachable"
            };
            Some(LifecycleError::Connection(msg.to_string()))
        }
        SdkError::TimeoutError(_) => Some(LifecycleError::Connection(
            "connection timed out, check your network or endpoint".to_string(),
        )),
        SdkError::ConstructionFailure(err) => Some(LifecycleError::Request(format!("{:?}", err))),
        SdkError::ResponseError(err) => Some(LifecycleError::Request(format!(
            "invalid response: {:?}",
            err
        ))),
        SdkError::ServiceError(_) => None,
        _ => Some(LifecycleError::Request(format!("unknown error: {:?}", err))),
    }
}

/// Map a DynamoDB service error code + message to a [`LifecycleError`].
pub(crate) fn map_service_code(
    code: Option<&str>,
    message: Option<&str>,
    display: &str,
    table: Option<&str>,
) -> LifecycleError {
    let table_name = || table.unwrap_or("<unknown>").to_string();
    let msg = message.unwrap_or(display).to_string();

    match code {
        Some("UnrecognizedClientException") | Some("InvalidSignatureException") => {
            LifecycleError::Credentials("check your access key and secret".to_string())
        }
        Some("ExpiredTokenException") => {
            LifecycleError::Credentials("credentials have expired".to_string())
        }
        Some("MissingAuthenticationTokenException") => {
            LifecycleError::Credentials("no credentials were supplied".to_string())
        }
        Some("AccessDeniedException") => LifecycleError::AccessDenied(msg),
        Some("ProvisionedThroughputExceededException")
        | Some("LimitExceededException")
        | Some("RequestLimitExceeded")
        | Some("ThrottlingException") => LifecycleError::Throttled(msg),
        Some("ResourceNotFoundException") => LifecycleError::TableNotFound { table: table_name() },
        Some("ResourceInUseException") => LifecycleError::TableInUse { table: table_name() },
        Some("ConditionalCheckFailedException") => {
            LifecycleError::ConditionalCheckFailed { table: table_name() }
        }
        Some("ValidationException") => LifecycleError::Validation(msg),
        Some(other) => LifecycleError::Service {
            code: other.to_string(),
            message: msg,
        },
        None => LifecycleError::Service {
            code: "Unknown".to_string(),
            message: msg,
        },
    }
}

/// Map DynamoDB errors using typed `SdkError` variants.
///
/// For `ServiceError`, uses `ProvideErrorMetadata` to get the error code and message
/// instead of parsing debug strings.
pub fn map_sdk_error<E, R>(err: SdkError<E, R>, table: Option<&str>) -> LifecycleError
where
    E: ProvideErrorMetadata + std::fmt::Debug + std::fmt::Display,
    R: std::fmt::Debug,
{
    if let Some(mapped) = map_outer_sdk_error(&err) {
        return mapped;
    }

    if let Some(service_err) = err.as_service_error() {
        let meta = ProvideErrorMetadata::meta(service_err);
        return map_service_code(meta.code(), meta.message(), &service_err.to_string(), table);
    }

    LifecycleError::Request(format!("unexpected DynamoDB error: {:?}", err))
}
