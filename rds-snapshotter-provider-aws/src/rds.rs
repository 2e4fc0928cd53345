use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_rds::Client;
use aws_sdk_rds::config::Credentials;
use aws_sdk_rds::types::Filter;
use aws_smithy_runtime_api::client::http::SharedHttpClient;
use log::{error, info};
use rds_snapshotter_models::core::TransportStatus;

use crate::config::DispatcherConfig;
use crate::credentials::AssumedCredentials;
use crate::sdk::{load_sdk_config, transport_status_of};

pub const INSTANCE_ID_FILTER: &str = "db-instance-id";

const SESSION_PROVIDER_NAME: &str = "rds-snapshotter-session";

/// The RDS calls a snapshot invocation makes.
#[async_trait]
pub trait RdsApi: Send + Sync {
    /// Identifiers of the DB instances matching `db-instance-id == instance_id`.
    async fn describe_db_instances(&self, instance_id: &str)
    -> Result<Vec<String>, TransportStatus>;

    async fn create_db_snapshot(&self, instance_id: &str, snapshot_name: &str) -> TransportStatus;

    async fn create_db_cluster_snapshot(
        &self,
        cluster_id: &str,
        snapshot_name: &str,
    ) -> TransportStatus;
}

/// Builds an [`RdsApi`] bound to assumed credentials and a region.
#[async_trait]
pub trait RdsConnector: Send + Sync {
    async fn connect(&self, credentials: &AssumedCredentials, region: &str) -> Box<dyn RdsApi>;
}

pub struct AwsRdsConnector {
    timeout: Duration,
    http_client: Option<SharedHttpClient>,
}

impl AwsRdsConnector {
    pub fn new(config: &DispatcherConfig) -> Self {
        Self {
            timeout: config.timeout,
            http_client: None,
        }
    }

    /// Sends every RDS request through `client` instead of the default HTTPS stack.
    pub fn with_http_client(mut self, client: SharedHttpClient) -> Self {
        self.http_client = Some(client);
        self
    }
}

#[async_trait]
impl RdsConnector for AwsRdsConnector {
    async fn connect(&self, credentials: &AssumedCredentials, region: &str) -> Box<dyn RdsApi> {
        let session = Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            Some(credentials.session_token.clone()),
            None,
            SESSION_PROVIDER_NAME,
        );
        let shared_config = load_sdk_config(region, session, self.timeout, self.http_client.as_ref()).await;
        Box::new(AwsRdsApi {
            client: Client::new(&shared_config),
        })
    }
}

pub struct AwsRdsApi {
    client: Client,
}

#[async_trait]
impl RdsApi for AwsRdsApi {
    async fn describe_db_instances(
        &self,
        instance_id: &str,
    ) -> Result<Vec<String>, TransportStatus> {
        let filter = Filter::builder()
            .name(INSTANCE_ID_FILTER)
            .values(instance_id)
            .build();

        let response = self
            .client
            .describe_db_instances()
            .filters(filter)
            .send()
            .await
            .map_err(|err| {
                error!("DescribeDBInstances failed for {}: {}", instance_id, err);
                transport_status_of(&err)
            })?;

        Ok(response
            .db_instances()
            .iter()
            .map(|instance| {
                instance
                    .db_instance_identifier()
                    .unwrap_or_default()
                    .to_string()
            })
            .collect())
    }

    async fn create_db_snapshot(&self, instance_id: &str, snapshot_name: &str) -> TransportStatus {
        let result = self
            .client
            .create_db_snapshot()
            .db_instance_identifier(instance_id)
            .db_snapshot_identifier(snapshot_name)
            .send()
            .await;

        match result {
            Ok(response) => {
                if let Some(status) = response.db_snapshot().and_then(|s| s.status()) {
                    info!("Snapshot {} is {}", snapshot_name, status);
                }
                TransportStatus::ok()
            }
            Err(err) => transport_status_of(&err),
        }
    }

    async fn create_db_cluster_snapshot(
        &self,
        cluster_id: &str,
        snapshot_name: &str,
    ) -> TransportStatus {
        let result = self
            .client
            .create_db_cluster_snapshot()
            .db_cluster_identifier(cluster_id)
            .db_cluster_snapshot_identifier(snapshot_name)
            .send()
            .await;

        match result {
            Ok(response) => {
                if let Some(status) = response.db_cluster_snapshot().and_then(|s| s.status()) {
                    info!("Cluster snapshot {} is {}", snapshot_name, status);
                }
                TransportStatus::ok()
            }
            Err(err) => transport_status_of(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::mock;

    const DESCRIBE_ONE: &str = r#"<DescribeDBInstancesResponse xmlns="http://rds.amazonaws.com/doc/2014-10-31/">
  <DescribeDBInstancesResult>
    <DBInstances>
      <DBInstance>
        <DBInstanceIdentifier>mydb</DBInstanceIdentifier>
      </DBInstance>
    </DBInstances>
  </DescribeDBInstancesResult>
  <ResponseMetadata><RequestId>5e2a0f1c</RequestId></ResponseMetadata>
</DescribeDBInstancesResponse>"#;

    const CLUSTER_SNAPSHOT_CREATING: &str = r#"<CreateDBClusterSnapshotResponse xmlns="http://rds.amazonaws.com/doc/2014-10-31/">
  <CreateDBClusterSnapshotResult>
    <DBClusterSnapshot>
      <DBClusterSnapshotIdentifier>weekly</DBClusterSnapshotIdentifier>
      <Status>creating</Status>
    </DBClusterSnapshot>
  </CreateDBClusterSnapshotResult>
  <ResponseMetadata><RequestId>7c1d9e40</RequestId></ResponseMetadata>
</CreateDBClusterSnapshotResponse>"#;

    const INTERNAL_FAILURE: &str = r#"<ErrorResponse xmlns="http://rds.amazonaws.com/doc/2014-10-31/">
  <Error>
    <Type>Receiver</Type>
    <Code>InternalFailure</Code>
    <Message>We encountered an internal error.</Message>
  </Error>
  <RequestId>0b8f3a77</RequestId>
</ErrorResponse>"#;

    fn session() -> AssumedCredentials {
        AssumedCredentials {
            access_key_id: "ASIATESTKEY".to_string(),
            secret_access_key: "session-secret".to_string(),
            session_token: "session-token".to_string(),
        }
    }

    async fn connect(client: SharedHttpClient) -> Box<dyn RdsApi> {
        AwsRdsConnector::new(&DispatcherConfig::default())
            .with_http_client(client)
            .connect(&session(), "us-west-2")
            .await
    }

    #[tokio::test]
    async fn describe_filters_on_instance_id() {
        let (client, requests) = mock::replying(200, DESCRIBE_ONE);
        let rds = connect(client).await;

        let found = rds.describe_db_instances("mydb").await.unwrap();

        assert_eq!(found, vec!["mydb".to_string()]);
        let requests = requests.lock();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].contains("Action=DescribeDBInstances"));
        assert!(requests[0].contains("Filters.Filter.1.Name=db-instance-id"));
        assert!(requests[0].contains("Filters.Filter.1.Values.Value.1=mydb"));
    }

    #[tokio::test]
    async fn cluster_snapshot_sends_cluster_identifiers() {
        let (client, requests) = mock::replying(200, CLUSTER_SNAPSHOT_CREATING);
        let rds = connect(client).await;

        let status = rds.create_db_cluster_snapshot("aurora-main", "weekly").await;

        assert_eq!(status, TransportStatus::ok());
        let requests = requests.lock();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].contains("Action=CreateDBClusterSnapshot"));
        assert!(requests[0].contains("DBClusterIdentifier=aurora-main"));
        assert!(requests[0].contains("DBClusterSnapshotIdentifier=weekly"));
    }

    #[tokio::test]
    async fn server_error_is_reported_once_without_retry() {
        let (client, requests) = mock::replying(500, INTERNAL_FAILURE);
        let rds = connect(client).await;

        let status = rds.create_db_snapshot("mydb", "nightly").await;

        assert_eq!(status, TransportStatus::new(500, "Internal Server Error"));
        let requests = requests.lock();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].contains("Action=CreateDBSnapshot"));
        assert!(requests[0].contains("DBSnapshotIdentifier=nightly"));
    }
}
