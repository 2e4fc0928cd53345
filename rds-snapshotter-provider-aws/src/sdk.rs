use std::time::Duration;

use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_sts::config::{Credentials, Region};
use aws_smithy_runtime_api::client::http::SharedHttpClient;
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::retry::RetryConfig;
use aws_smithy_types::timeout::TimeoutConfig;
use rds_snapshotter_models::core::TransportStatus;

/// Shared SDK configuration pinned to explicit credentials and region, so nothing is
/// picked up from the ambient credential chain. Retries are off: a failed call ends
/// the invocation, and CreateDBSnapshot must never be sent twice.
pub(crate) async fn load_sdk_config(
    region: &str,
    credentials: Credentials,
    timeout: Duration,
    http_client: Option<&SharedHttpClient>,
) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::v2025_08_07())
        .region(Region::new(region.to_string()))
        .credentials_provider(credentials)
        .retry_config(RetryConfig::disabled())
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(timeout)
                .build(),
        );
    if let Some(client) = http_client {
        loader = loader.http_client(client.clone());
    }
    loader.load().await
}

/// Transport outcome of a failed SDK call. Failures that never produced an HTTP
/// response (timeouts, connection errors) get code 0 and the error text.
pub(crate) fn transport_status_of<E>(err: &SdkError<E, HttpResponse>) -> TransportStatus
where
    E: std::error::Error + 'static,
{
    match err.raw_response() {
        Some(raw) => {
            let code = raw.status().as_u16();
            TransportStatus::new(code, status_text(code))
        }
        None => TransportStatus::new(0, DisplayErrorContext(err).to_string()),
    }
}

pub(crate) fn describe_sdk_error<E>(err: &SdkError<E, HttpResponse>) -> String
where
    E: std::error::Error + 'static,
{
    DisplayErrorContext(err).to_string()
}

pub fn status_text(code: u16) -> String {
    http::StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", code))
}
