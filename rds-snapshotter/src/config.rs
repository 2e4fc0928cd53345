use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Parser;
use rds_snapshotter_models::core::SnapshotRequest;
use rds_snapshotter_models::errors::{RuntimeError, SendableError};
use rds_snapshotter_provider_aws::config::{
    DEFAULT_REGION, DEFAULT_ROLE_NAME, DEFAULT_SESSION_NAME, DEFAULT_TIMEOUT_SECS,
    DispatcherConfig,
};
use rds_snapshotter_provider_aws::credentials::{ACCESS_KEY_ENV, SECRET_KEY_ENV};
use rds_snapshotter_utilities::logger::DEFAULT_LOG_FILE;

#[derive(Debug, Clone)]
pub struct Config {
    pub request: SnapshotRequest,
    pub dispatcher: DispatcherConfig,
    pub access_key_env: String,
    pub secret_key_env: String,
    pub log_file: PathBuf,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Start an RDS instance or cluster snapshot", long_about = None)]
pub struct CliArgs {
    /// JSON file with awsAccount, region, instanceName and snapshotName.
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long)]
    aws_account: Option<String>,

    #[arg(long)]
    region: Option<String>,

    #[arg(long)]
    instance_name: Option<String>,

    #[arg(long)]
    snapshot_name: Option<String>,

    #[arg(long, default_value = DEFAULT_ROLE_NAME)]
    role_name: String,

    #[arg(long, default_value = DEFAULT_SESSION_NAME)]
    session_name: String,

    #[arg(long, default_value = DEFAULT_REGION)]
    default_region: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_seconds: u64,

    #[arg(long, default_value = ACCESS_KEY_ENV)]
    access_key_env: String,

    #[arg(long, default_value = SECRET_KEY_ENV)]
    secret_key_env: String,

    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

pub fn parse_config() -> Result<Config, SendableError> {
    build_config(CliArgs::parse())
}

pub fn build_config(args: CliArgs) -> Result<Config, SendableError> {
    let mut request = match args.input {
        Some(ref path) => read_request(path)?,
        None => SnapshotRequest::default(),
    };

    if let Some(value) = args.aws_account {
        request.aws_account = value;
    }
    if let Some(value) = args.region {
        request.region = value;
    }
    if let Some(value) = args.instance_name {
        request.instance_name = value;
    }
    if let Some(value) = args.snapshot_name {
        request.snapshot_name = value;
    }

    if args.timeout_seconds == 0 {
        return Err(Box::new(RuntimeError::new(
            "config.invalid_timeout".into(),
            "--timeout-seconds must be greater than zero".into(),
        )));
    }

    Ok(Config {
        request,
        dispatcher: DispatcherConfig {
            role_name: args.role_name,
            session_name: args.session_name,
            default_region: args.default_region,
            timeout: Duration::from_secs(args.timeout_seconds),
        },
        access_key_env: args.access_key_env,
        secret_key_env: args.secret_key_env,
        log_file: args.log_file,
    })
}

fn read_request(path: &Path) -> Result<SnapshotRequest, SendableError> {
    let data = fs::read_to_string(path).map_err(|err| -> SendableError {
        Box::new(RuntimeError::new(
            "config.input_unreadable".into(),
            format!("Unable to read {}: {}", path.display(), err),
        ))
    })?;
    serde_json::from_str(&data).map_err(|err| -> SendableError {
        Box::new(RuntimeError::new(
            "config.input_invalid".into(),
            format!("Invalid request JSON in {}: {}", path.display(), err),
        ))
    })
}
