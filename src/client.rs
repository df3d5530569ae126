//! DynamoDB client construction.
//!
//! Region, endpoint and credentials all come from [`ClientSettings`]:
//! - Static credentials (local emulator placeholders by default)
//! - Custom endpoint URL (LocalStack by default)
//! - Explicit region, falling back to the default region chain

use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{Credentials, Region};
use tracing::debug;

use crate::config::ClientSettings;
use crate::errors::{LifecycleError, Result};

const CREDENTIALS_PROVIDER_NAME: &str = "dynamo-lifecycle-static";

/// Build the AWS SDK DynamoDB client from `settings`.
///
/// # Errors
///
/// Returns a validation error if the endpoint URL is not an http(s) URL.
pub async fn build_client(settings: &ClientSettings) -> Result<Client> {
    if let Some(url) = &settings.endpoint_url {
        validate_endpoint(url)?;
    }

    // Region priority: settings > env/profile > default
    let region_provider = RegionProviderChain::first_try(settings.region.clone().map(Region::new))
        .or_default_provider()
        .or_else("us-east-1");

    let mut config_loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

    if let Some(creds) = &settings.credentials {
        let creds = Credentials::new(
            &creds.access_key_id,
            &creds.secret_access_key,
            creds.session_token.clone(),
            None,
            CREDENTIALS_PROVIDER_NAME,
        );
        config_loader = config_loader.credentials_provider(creds);
    }
    // else: uses default credential chain (env vars, profile, instance role)

    let sdk_config = config_loader.load().await;

    let mut dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config);

    if let Some(url) = &settings.endpoint_url {
        dynamo_config = dynamo_config.endpoint_url(url);
    }

    debug!(
        region = ?sdk_config.region(),
        endpoint = settings.endpoint_url.as_deref().unwrap_or("<default>"),
        "built DynamoDB client"
    );

    Ok(Client::from_conf(dynamo_config.build()))
}

fn validate_endpoint(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(LifecycleError::Validation(format!(
            "endpoint URL must start with http:// or https:// and name a host, got '{}'",
            url
        ))),
    }
}
