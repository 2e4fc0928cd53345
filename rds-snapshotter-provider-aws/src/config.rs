use std::time::Duration;

pub const DEFAULT_ROLE_NAME: &str = "spinnakerManaged-terraform";
pub const DEFAULT_SESSION_NAME: &str = "Spinnaker";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Fixed settings shared by every invocation of a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Role assumed in the target account.
    pub role_name: String,
    pub session_name: String,
    /// Region for STS, and for RDS when the request leaves it empty.
    pub default_region: String,
    /// Per-operation timeout applied to SDK clients.
    pub timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            role_name: DEFAULT_ROLE_NAME.to_string(),
            session_name: DEFAULT_SESSION_NAME.to_string(),
            default_region: DEFAULT_REGION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl DispatcherConfig {
    pub fn role_arn(&self, account: &str) -> String {
        format!("arn:aws:iam::{}:role/{}", account, self.role_name)
    }
}

pub fn normalize_timeout(timeout_secs: i64) -> Duration {
    if timeout_secs <= 0 {
        Duration::from_secs(DEFAULT_TIMEOUT_SECS)
    } else {
        Duration::from_secs(timeout_secs as u64)
    }
}
