use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_sts::Client;
use aws_sdk_sts::config::Credentials;
use aws_smithy_runtime_api::client::http::SharedHttpClient;
use log::{error, info};
use rds_snapshotter_models::errors::SnapshotError;

use crate::config::DispatcherConfig;
use crate::credentials::{AssumedCredentials, BaseCredentials};
use crate::sdk::{describe_sdk_error, load_sdk_config};

const BASE_PROVIDER_NAME: &str = "rds-snapshotter-base";

/// Exchanges base credentials for temporary ones in the target account.
#[async_trait]
pub trait RoleAssumer: Send + Sync {
    async fn assume_role(
        &self,
        base: &BaseCredentials,
        role_arn: &str,
        session_name: &str,
    ) -> Result<AssumedCredentials, SnapshotError>;
}

pub struct StsRoleAssumer {
    region: String,
    timeout: Duration,
    http_client: Option<SharedHttpClient>,
}

impl StsRoleAssumer {
    pub fn new(config: &DispatcherConfig) -> Self {
        Self {
            region: config.default_region.clone(),
            timeout: config.timeout,
            http_client: None,
        }
    }

    pub fn with_http_client(mut self, client: SharedHttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    async fn build_client(&self, base: &BaseCredentials) -> Client {
        let credentials = Credentials::new(
            base.access_key_id.clone(),
            base.secret_access_key.clone(),
            None,
            None,
            BASE_PROVIDER_NAME,
        );
        let shared_config = load_sdk_config(
            &self.region,
            credentials,
            self.timeout,
            self.http_client.as_ref(),
        )
        .await;
        Client::new(&shared_config)
    }
}

#[async_trait]
impl RoleAssumer for StsRoleAssumer {
    async fn assume_role(
        &self,
        base: &BaseCredentials,
        role_arn: &str,
        session_name: &str,
    ) -> Result<AssumedCredentials, SnapshotError> {
        let client = self.build_client(base).await;

        info!("Assuming role: {}", role_arn);
        let response = client
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .send()
            .await
            .map_err(|err| {
                let reason = describe_sdk_error(&err);
                error!("Error assuming role {}, Error: {}", role_arn, reason);
                SnapshotError::AssumeRole {
                    role_arn: role_arn.to_string(),
                    reason,
                }
            })?;

        let credentials = response.credentials().ok_or_else(|| SnapshotError::AssumeRole {
            role_arn: role_arn.to_string(),
            reason: "AssumeRole response carried no credentials".to_string(),
        })?;

        match response.assumed_role_user() {
            Some(user) => info!("Successfully assumed role: {}", user.arn()),
            None => info!("Successfully assumed role: {}", role_arn),
        }

        Ok(AssumedCredentials {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
        })
    }
}
