mod config;

use std::process::ExitCode;
use std::sync::Arc;

use config::parse_config;
use log::info;
use rds_snapshotter_models::errors::SendableError;
use rds_snapshotter_provider_aws::credentials::EnvCredentialsSource;
use rds_snapshotter_provider_aws::dispatcher::SnapshotDispatcher;
use rds_snapshotter_provider_aws::run_snapshot;
use rds_snapshotter_utilities::startup;

#[tokio::main]
async fn main() -> Result<ExitCode, SendableError> {
    let config = parse_config()?;
    startup::startup("RDS Snapshotter", &config.log_file)?;

    let credentials = Arc::new(EnvCredentialsSource::new(
        config.access_key_env.clone(),
        config.secret_key_env.clone(),
    ));
    let timeout = config.dispatcher.timeout;
    let dispatcher = SnapshotDispatcher::aws(config.dispatcher.clone(), credentials);

    info!(
        "Snapshotting {} in account {}",
        config.request.instance_name, config.request.aws_account
    );
    let outcome = run_snapshot(&dispatcher, &config.request, timeout).await;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if outcome.is_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
