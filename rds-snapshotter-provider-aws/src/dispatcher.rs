use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use rds_snapshotter_models::core::{
    STAGE_NAME, SnapshotRequest, SnapshotResult, StageOutcome, StageOutput,
};
use rds_snapshotter_models::errors::{ErrorKind, SnapshotError};

use crate::config::DispatcherConfig;
use crate::credentials::{AssumedCredentials, CredentialsSource};
use crate::rds::{AwsRdsConnector, RdsApi, RdsConnector};
use crate::region::resolve_region;
use crate::sts::{RoleAssumer, StsRoleAssumer};

/// Runs one snapshot invocation:
/// validate account, assume role, resolve region, validate instance, name the
/// snapshot, classify instance vs cluster, create the snapshot.
///
/// Nothing is retried and nothing is shared between invocations; credentials and
/// clients are built fresh for every call to [`SnapshotDispatcher::dispatch`].
pub struct SnapshotDispatcher {
    config: DispatcherConfig,
    credentials: Arc<dyn CredentialsSource>,
    role_assumer: Arc<dyn RoleAssumer>,
    connector: Arc<dyn RdsConnector>,
}

impl SnapshotDispatcher {
    pub fn new(
        config: DispatcherConfig,
        credentials: Arc<dyn CredentialsSource>,
        role_assumer: Arc<dyn RoleAssumer>,
        connector: Arc<dyn RdsConnector>,
    ) -> Self {
        Self {
            config,
            credentials,
            role_assumer,
            connector,
        }
    }

    /// Dispatcher backed by the real STS and RDS endpoints.
    pub fn aws(config: DispatcherConfig, credentials: Arc<dyn CredentialsSource>) -> Self {
        let role_assumer = Arc::new(StsRoleAssumer::new(&config));
        let connector = Arc::new(AwsRdsConnector::new(&config));
        Self::new(config, credentials, role_assumer, connector)
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub async fn dispatch(&self, request: &SnapshotRequest) -> StageOutcome {
        match self.try_dispatch(request).await {
            Ok(output) => {
                info!(
                    "Snapshot successfully started for {}",
                    output.db_identifier
                );
                StageOutcome::succeeded(output)
            }
            Err(err) => {
                match err.kind() {
                    ErrorKind::InputValidation => warn!("{}", err.detail()),
                    ErrorKind::Authentication => {
                        error!("Unable to assume AWS Role to snapshot database: {}", err.detail())
                    }
                    ErrorKind::Provisioning => error!(
                        "Snapshot failed to start for {}: {}",
                        request.instance_name,
                        err.detail()
                    ),
                }
                StageOutcome::terminal(err.to_string())
            }
        }
    }

    async fn try_dispatch(&self, request: &SnapshotRequest) -> Result<StageOutput, SnapshotError> {
        let account = request.aws_account.trim();
        if account.is_empty() {
            return Err(SnapshotError::MissingAccount);
        }

        let credentials = self.assume_role(account).await?;

        let region = resolve_region(&request.region, &self.config.default_region)?;

        let instance_name = request.instance_name.trim();
        if instance_name.is_empty() {
            return Err(SnapshotError::MissingInstanceName);
        }

        let snapshot_name = resolve_snapshot_name(instance_name, &request.snapshot_name, Utc::now());

        let rds = self.connector.connect(&credentials, &region).await;
        let clustered = is_db_clustered(rds.as_ref(), instance_name).await?;
        info!("{} is DB cluster: {}", instance_name, clustered);

        let status = if clustered {
            info!(
                "Requesting cluster snapshot for instance: {} with snapshot name: {}",
                instance_name, snapshot_name
            );
            rds.create_db_cluster_snapshot(instance_name, &snapshot_name)
                .await
        } else {
            info!(
                "Requesting instance snapshot for instance: {} with snapshot name: {}",
                instance_name, snapshot_name
            );
            rds.create_db_snapshot(instance_name, &snapshot_name).await
        };

        if !SnapshotResult::from(&status).succeeded {
            return Err(SnapshotError::SnapshotRejected { status });
        }

        Ok(StageOutput {
            name: STAGE_NAME.to_string(),
            snapshot_name,
            db_identifier: instance_name.to_string(),
            clustered,
        })
    }

    async fn assume_role(&self, account: &str) -> Result<AssumedCredentials, SnapshotError> {
        let base = self.credentials.base_credentials()?;
        let role_arn = self.config.role_arn(account);
        self.role_assumer
            .assume_role(&base, &role_arn, &self.config.session_name)
            .await
    }
}

/// The requested name, or `{instance}-{epoch seconds}` when none was given.
pub fn resolve_snapshot_name(instance_name: &str, requested: &str, now: DateTime<Utc>) -> String {
    let requested = requested.trim();
    if !requested.is_empty() {
        return requested.to_string();
    }

    let generated = format!("{}-{}", instance_name, now.timestamp());
    info!(
        "Snapshot name not specified, using generated name: {}",
        generated
    );
    generated
}

/// A target listed by DescribeDBInstances is a standalone instance; anything else is
/// treated as a cluster.
async fn is_db_clustered(rds: &dyn RdsApi, instance_name: &str) -> Result<bool, SnapshotError> {
    info!(
        "Searching for instance by db instance id: {}",
        instance_name
    );
    let instances = rds
        .describe_db_instances(instance_name)
        .await
        .map_err(|status| SnapshotError::Classification {
            instance: instance_name.to_string(),
            status,
        })?;

    Ok(instances.is_empty())
}
