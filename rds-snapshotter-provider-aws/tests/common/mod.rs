#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rds_snapshotter_models::core::TransportStatus;
use rds_snapshotter_models::errors::SnapshotError;
use rds_snapshotter_provider_aws::config::DispatcherConfig;
use rds_snapshotter_provider_aws::credentials::{
    AssumedCredentials, BaseCredentials, CredentialsSource, StaticCredentialsSource,
};
use rds_snapshotter_provider_aws::dispatcher::SnapshotDispatcher;
use rds_snapshotter_provider_aws::rds::{RdsApi, RdsConnector};
use rds_snapshotter_provider_aws::sts::RoleAssumer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AwsCall {
    AssumeRole {
        access_key_id: String,
        role_arn: String,
        session_name: String,
    },
    Connect {
        region: String,
        access_key_id: String,
        session_token: String,
    },
    DescribeDbInstances {
        instance_id: String,
    },
    CreateDbSnapshot {
        instance_id: String,
        snapshot_name: String,
    },
    CreateDbClusterSnapshot {
        cluster_id: String,
        snapshot_name: String,
    },
}

#[derive(Default)]
pub struct CallLog {
    calls: Mutex<Vec<AwsCall>>,
}

impl CallLog {
    pub fn record(&self, call: AwsCall) {
        self.calls.lock().push(call);
    }

    pub fn calls(&self) -> Vec<AwsCall> {
        self.calls.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    pub fn snapshot_calls(&self) -> Vec<AwsCall> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    AwsCall::CreateDbSnapshot { .. } | AwsCall::CreateDbClusterSnapshot { .. }
                )
            })
            .collect()
    }
}

pub fn session_credentials() -> AssumedCredentials {
    AssumedCredentials {
        access_key_id: "ASIATESTSESSION".to_string(),
        secret_access_key: "session-secret".to_string(),
        session_token: "session-token".to_string(),
    }
}

pub struct FakeRoleAssumer {
    log: Arc<CallLog>,
    result: Result<AssumedCredentials, SnapshotError>,
    delay: Option<Duration>,
}

#[async_trait]
impl RoleAssumer for FakeRoleAssumer {
    async fn assume_role(
        &self,
        base: &BaseCredentials,
        role_arn: &str,
        session_name: &str,
    ) -> Result<AssumedCredentials, SnapshotError> {
        self.log.record(AwsCall::AssumeRole {
            access_key_id: base.access_key_id.clone(),
            role_arn: role_arn.to_string(),
            session_name: session_name.to_string(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}

#[derive(Clone)]
pub struct FakeRds {
    log: Arc<CallLog>,
    instances: Result<Vec<String>, TransportStatus>,
    snapshot_status: TransportStatus,
}

#[async_trait]
impl RdsApi for FakeRds {
    async fn describe_db_instances(
        &self,
        instance_id: &str,
    ) -> Result<Vec<String>, TransportStatus> {
        self.log.record(AwsCall::DescribeDbInstances {
            instance_id: instance_id.to_string(),
        });
        self.instances.clone()
    }

    async fn create_db_snapshot(&self, instance_id: &str, snapshot_name: &str) -> TransportStatus {
        self.log.record(AwsCall::CreateDbSnapshot {
            instance_id: instance_id.to_string(),
            snapshot_name: snapshot_name.to_string(),
        });
        self.snapshot_status.clone()
    }

    async fn create_db_cluster_snapshot(
        &self,
        cluster_id: &str,
        snapshot_name: &str,
    ) -> TransportStatus {
        self.log.record(AwsCall::CreateDbClusterSnapshot {
            cluster_id: cluster_id.to_string(),
            snapshot_name: snapshot_name.to_string(),
        });
        self.snapshot_status.clone()
    }
}

pub struct FakeConnector {
    rds: FakeRds,
}

#[async_trait]
impl RdsConnector for FakeConnector {
    async fn connect(&self, credentials: &AssumedCredentials, region: &str) -> Box<dyn RdsApi> {
        self.rds.log.record(AwsCall::Connect {
            region: region.to_string(),
            access_key_id: credentials.access_key_id.clone(),
            session_token: credentials.session_token.clone(),
        });
        Box::new(self.rds.clone())
    }
}

/// Scripted AWS behaviour for one dispatcher.
pub struct Harness {
    pub log: Arc<CallLog>,
    pub credentials: Arc<dyn CredentialsSource>,
    pub assume_result: Result<AssumedCredentials, SnapshotError>,
    pub assume_delay: Option<Duration>,
    pub instances: Result<Vec<String>, TransportStatus>,
    pub snapshot_status: TransportStatus,
    pub config: DispatcherConfig,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            log: Arc::new(CallLog::default()),
            credentials: Arc::new(StaticCredentialsSource::new(BaseCredentials::new(
                "AKIDBASE",
                "base-secret",
            ))),
            assume_result: Ok(session_credentials()),
            assume_delay: None,
            instances: Ok(vec!["mydb".to_string()]),
            snapshot_status: TransportStatus::ok(),
            config: DispatcherConfig::default(),
        }
    }
}

impl Harness {
    pub fn standalone_instance() -> Self {
        Self::default()
    }

    pub fn cluster() -> Self {
        Self {
            instances: Ok(Vec::new()),
            ..Self::default()
        }
    }

    pub fn failing_assume_role() -> Self {
        Self {
            assume_result: Err(SnapshotError::AssumeRole {
                role_arn: "arn:aws:iam::123456789012:role/spinnakerManaged-terraform".to_string(),
                reason: "403 Forbidden".to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn with_snapshot_status(mut self, status: TransportStatus) -> Self {
        self.snapshot_status = status;
        self
    }

    pub fn dispatcher(&self) -> SnapshotDispatcher {
        let role_assumer = Arc::new(FakeRoleAssumer {
            log: Arc::clone(&self.log),
            result: self.assume_result.clone(),
            delay: self.assume_delay,
        });
        let connector = Arc::new(FakeConnector {
            rds: FakeRds {
                log: Arc::clone(&self.log),
                instances: self.instances.clone(),
                snapshot_status: self.snapshot_status.clone(),
            },
        });
        SnapshotDispatcher::new(
            self.config.clone(),
            Arc::clone(&self.credentials),
            role_assumer,
            connector,
        )
    }
}
