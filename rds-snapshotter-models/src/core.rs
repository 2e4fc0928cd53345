use serde::{Deserialize, Serialize};

pub const STAGE_NAME: &str = "rdsSnapshotter";

/// Part of the pipeline context the stage consumes.
///
/// Every field defaults to an empty string so that a missing key reaches
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRequest {
    #[serde(default)]
    pub aws_account: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub instance_name: String,
    #[serde(default)]
    pub snapshot_name: String,
}

impl SnapshotRequest {
    pub fn new(
        aws_account: impl Into<String>,
        region: impl Into<String>,
        instance_name: impl Into<String>,
        snapshot_name: impl Into<String>,
    ) -> Self {
        Self {
            aws_account: aws_account.into(),
            region: region.into(),
            instance_name: instance_name.into(),
            snapshot_name: snapshot_name.into(),
        }
    }
}

/// HTTP-level outcome of an API call, independent of any error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportStatus {
    pub code: u16,
    pub text: String,
}

impl TransportStatus {
    pub fn new(code: u16, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200, "OK")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotResult {
    pub succeeded: bool,
    pub http_status_text: Option<String>,
}

impl From<&TransportStatus> for SnapshotResult {
    fn from(status: &TransportStatus) -> Self {
        if status.is_success() {
            Self {
                succeeded: true,
                http_status_text: None,
            }
        } else {
            Self {
                succeeded: false,
                http_status_text: Some(status.text.clone()),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageStatus {
    Succeeded,
    Terminal,
}

/// Values handed back to the pipeline for later stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageOutput {
    pub name: String,
    pub snapshot_name: String,
    pub db_identifier: String,
    pub clustered: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutcome {
    pub status: StageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<StageOutput>,
    #[serde(default)]
    pub context: StageContext,
}

impl StageOutcome {
    pub fn succeeded(output: StageOutput) -> Self {
        Self {
            status: StageStatus::Succeeded,
            output: Some(output),
            context: StageContext::default(),
        }
    }

    pub fn terminal(error_message: impl Into<String>) -> Self {
        Self {
            status: StageStatus::Terminal,
            output: None,
            context: StageContext {
                error_message: Some(error_message.into()),
            },
        }
    }

    pub fn is_succeeded(&self) -> bool {
        self.status == StageStatus::Succeeded
    }

    pub fn error_message(&self) -> Option<&str> {
        self.context.error_message.as_deref()
    }
}
