pub mod config;
pub mod credentials;
pub mod dispatcher;
pub mod rds;
pub mod region;
mod sdk;
pub mod sts;

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use rds_snapshotter_models::core::{STAGE_NAME, SnapshotRequest, StageOutcome};
use rds_snapshotter_models::errors::{RuntimeError, SendableError};
use rds_snapshotter_plugin::provider::Provider;
use tokio::time;

use crate::config::{DispatcherConfig, normalize_timeout};
use crate::credentials::EnvCredentialsSource;
use crate::dispatcher::SnapshotDispatcher;

pub use crate::sdk::status_text;

pub const SNAPSHOT_CALL: &str = "snapshot";

/// Runs one dispatch, turning an elapsed `timeout` into a terminal outcome.
pub async fn run_snapshot(
    dispatcher: &SnapshotDispatcher,
    request: &SnapshotRequest,
    timeout: Duration,
) -> StageOutcome {
    match time::timeout(timeout, dispatcher.dispatch(request)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            let message = format!(
                "Timed out after {} while snapshotting {}",
                humantime::format_duration(timeout),
                request.instance_name
            );
            warn!("{}", message);
            StageOutcome::terminal(message)
        }
    }
}

/// Exposes the dispatcher through the synchronous [`Provider`] contract.
#[derive(Clone)]
pub struct RdsSnapshotterProvider {
    dispatcher: Arc<SnapshotDispatcher>,
}

impl RdsSnapshotterProvider {
    pub fn new(dispatcher: Arc<SnapshotDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// AWS-backed provider reading base credentials from the standard variables.
    pub fn from_env(config: DispatcherConfig) -> Self {
        let credentials = Arc::new(EnvCredentialsSource::default());
        Self::new(Arc::new(SnapshotDispatcher::aws(config, credentials)))
    }

    pub fn execute(&self, args: &str, timeout_secs: i64) -> Result<StageOutcome, SendableError> {
        let request: SnapshotRequest = serde_json::from_str(args).map_err(|err| {
            Box::new(RuntimeError::new(
                "SNAPSHOTTER_INVALID_REQUEST".to_string(),
                format!("Unable to parse snapshot request: {}", err),
            )) as SendableError
        })?;
        let timeout = normalize_timeout(timeout_secs);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("rds-snapshotter")
            .build()?;

        let dispatcher = Arc::clone(&self.dispatcher);
        Ok(runtime.block_on(async move { run_snapshot(&dispatcher, &request, timeout).await }))
    }

    /// Handles one host call: checks the call name, runs the stage and logs the
    /// outcome. Both the [`Provider`] impl and the plugin export go through here.
    pub fn run_call(
        &self,
        call: &str,
        args: &str,
        timeout_secs: i64,
    ) -> Result<StageOutcome, SendableError> {
        if !call.eq_ignore_ascii_case(SNAPSHOT_CALL) {
            return Err(Box::new(RuntimeError::new(
                "SNAPSHOTTER_UNKNOWN_CALL".to_string(),
                format!("Unsupported call '{}', expected '{}'", call, SNAPSHOT_CALL),
            )));
        }

        let outcome = self.execute(args, timeout_secs)?;
        info!("Stage outcome: {}", serde_json::to_string(&outcome)?);
        Ok(outcome)
    }
}

impl Provider for RdsSnapshotterProvider {
    fn name(&self) -> String {
        STAGE_NAME.to_string()
    }

    fn call_service(&self, call: String, args: String, timeout_secs: i64) -> Result<i32, SendableError> {
        let outcome = self.run_call(&call, &args, timeout_secs)?;
        if outcome.is_succeeded() {
            Ok(0)
        } else {
            Err(Box::new(RuntimeError::new(
                "SNAPSHOTTER_TERMINAL".to_string(),
                outcome.error_message().unwrap_or_default().to_string(),
            )))
        }
    }
}
