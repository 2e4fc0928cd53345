use std::{env, path::Path, time::SystemTime};

use log::info;
use rds_snapshotter_models::errors::SendableError;

pub const DEFAULT_LOG_FILE: &str = "rds-snapshotter.log";

pub fn setup_logger() -> Result<(), SendableError> {
    setup_file_logger(Path::new(DEFAULT_LOG_FILE))
}

/// Logs to stderr and appends to `log_file`. Stdout is left free for stage output.
pub fn setup_file_logger(log_file: &Path) -> Result<(), SendableError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .level_for("aws_config", log::LevelFilter::Warn)
        .level_for("aws_smithy_runtime", log::LevelFilter::Warn)
        .chain(std::io::stderr())
        .chain(fern::log_file(log_file)?)
        .apply()?;
    Ok(())
}

pub fn print_env() -> std::io::Result<()> {
    let path = env::current_dir()?;
    info!("The current directory is {}", path.display());
    Ok(())
}
