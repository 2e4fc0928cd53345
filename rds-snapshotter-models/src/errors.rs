use std::fmt;

use thiserror::Error;

use crate::core::TransportStatus;

pub type SendableError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
pub struct RuntimeError {
    code: String,
    message: String,
}

impl RuntimeError {
    pub fn new(code: String, message: String) -> Self {
        Self { code, message }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

pub const ASSUME_ROLE_FAILED: &str = "Unable to assume AWS IAM role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputValidation,
    Authentication,
    Provisioning,
}

/// Failures of a single snapshot invocation.
///
/// `Display` is the one-line message handed back to the pipeline. Authentication
/// failures all share one message; the underlying cause is only available through
/// [`SnapshotError::detail`] for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("AWS Account must be specified")]
    MissingAccount,

    #[error("Invalid AWS region specified, please provide a valid region: {0}")]
    InvalidRegion(String),

    #[error("RDS instance name must be specified")]
    MissingInstanceName,

    #[error("Unable to assume AWS IAM role")]
    MissingBaseCredentials(String),

    #[error("Unable to assume AWS IAM role")]
    AssumeRole { role_arn: String, reason: String },

    #[error("{}", .status.text)]
    Classification {
        instance: String,
        status: TransportStatus,
    },

    #[error("{}", .status.text)]
    SnapshotRejected { status: TransportStatus },
}

impl SnapshotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SnapshotError::MissingAccount
            | SnapshotError::InvalidRegion(_)
            | SnapshotError::MissingInstanceName => ErrorKind::InputValidation,
            SnapshotError::MissingBaseCredentials(_) | SnapshotError::AssumeRole { .. } => {
                ErrorKind::Authentication
            }
            SnapshotError::Classification { .. } | SnapshotError::SnapshotRejected { .. } => {
                ErrorKind::Provisioning
            }
        }
    }

    /// Log-only description, including causes that are never shown to the caller.
    pub fn detail(&self) -> String {
        match self {
            SnapshotError::MissingBaseCredentials(variable) => {
                format!("base AWS credential {} is not configured", variable)
            }
            SnapshotError::AssumeRole { role_arn, reason } => {
                format!("Error assuming role {}, Error: {}", role_arn, reason)
            }
            SnapshotError::Classification { instance, status } => format!(
                "Unable to describe DB instance {} ({} {})",
                instance, status.code, status.text
            ),
            SnapshotError::SnapshotRejected { status } => {
                format!("Snapshot request rejected ({} {})", status.code, status.text)
            }
            other => other.to_string(),
        }
    }
}
