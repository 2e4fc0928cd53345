use std::{env, fmt};

use rds_snapshotter_models::errors::SnapshotError;

pub const ACCESS_KEY_ENV: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";

const REDACTED: &str = "** redacted **";

/// Long-lived key pair used only to call STS.
#[derive(Clone, PartialEq, Eq)]
pub struct BaseCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl BaseCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }
}

impl fmt::Debug for BaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &REDACTED)
            .finish()
    }
}

/// Temporary credentials returned by AssumeRole, scoped to one invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct AssumedCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

impl fmt::Debug for AssumedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssumedCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &REDACTED)
            .field("session_token", &REDACTED)
            .finish()
    }
}

pub trait CredentialsSource: Send + Sync {
    fn base_credentials(&self) -> Result<BaseCredentials, SnapshotError>;
}

#[derive(Debug, Clone)]
pub struct StaticCredentialsSource {
    credentials: BaseCredentials,
}

impl StaticCredentialsSource {
    pub fn new(credentials: BaseCredentials) -> Self {
        Self { credentials }
    }
}

impl CredentialsSource for StaticCredentialsSource {
    fn base_credentials(&self) -> Result<BaseCredentials, SnapshotError> {
        Ok(self.credentials.clone())
    }
}

/// Reads the key pair from two environment variables on every call.
#[derive(Debug, Clone)]
pub struct EnvCredentialsSource {
    access_key_var: String,
    secret_key_var: String,
}

impl EnvCredentialsSource {
    pub fn new(access_key_var: impl Into<String>, secret_key_var: impl Into<String>) -> Self {
        Self {
            access_key_var: access_key_var.into(),
            secret_key_var: secret_key_var.into(),
        }
    }

    fn read(variable: &str) -> Result<String, SnapshotError> {
        env::var(variable)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| SnapshotError::MissingBaseCredentials(variable.to_string()))
    }
}

impl Default for EnvCredentialsSource {
    fn default() -> Self {
        Self::new(ACCESS_KEY_ENV, SECRET_KEY_ENV)
    }
}

impl CredentialsSource for EnvCredentialsSource {
    fn base_credentials(&self) -> Result<BaseCredentials, SnapshotError> {
        Ok(BaseCredentials {
            access_key_id: Self::read(&self.access_key_var)?,
            secret_access_key: Self::read(&self.secret_key_var)?,
        })
    }
}
