//! APNs Configuration
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ApnsError;

/// Where the `.p8` signing key comes from
#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    /// PEM bytes supplied directly (e.g. from a secret store)
    Inline(Vec<u8>),
    /// Path to a PEM file on disk
    File(PathBuf),
}

impl KeySource {
    /// Resolve the source into raw key bytes
    pub fn load(&self) -> Result<Vec<u8>, ApnsError> {
        match self {
            KeySource::Inline(bytes) => Ok(bytes.clone()),
            KeySource::File(path) => std::fs::read(path).map_err(|source| ApnsError::KeyRead {
                path: path.clone(),
                source,
            }),
        }
    }
}

// Key material never reaches logs.
impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Inline(bytes) => write!(f, "Inline(<{} bytes>)", bytes.len()),
            KeySource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// APNs delivery environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApnsMode {
    Production,
    Development,
}

impl ApnsMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApnsMode::Production => "production",
            ApnsMode::Development => "development",
        }
    }

    /// Get APNs API endpoint based on environment
    pub fn endpoint(&self) -> &'static str {
        match self {
            ApnsMode::Production => "api.push.apple.com",
            ApnsMode::Development => "api.sandbox.push.apple.com",
        }
    }
}

impl FromStr for ApnsMode {
    type Err = ApnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(ApnsMode::Production),
            "development" => Ok(ApnsMode::Development),
            other => Err(ApnsError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for ApnsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// APNs Configuration
///
/// `mode` is kept as the raw string and validated by
/// [`ApnsDelivery::new`](crate::ApnsDelivery::new).
#[derive(Debug, Clone)]
pub struct ApnsConfig {
    pub key: KeySource,
    pub key_id: String,
    pub team_id: String,
    /// Routing topic (bundle id) for every notification
    pub topic: String,
    /// "production" or "development"
    pub mode: String,
}

/// Raw `APNS_*` environment variables
#[derive(Debug, Deserialize)]
struct ApnsEnv {
    p8_certificate: Option<String>,
    p8_certificate_file_path: Option<String>,
    key_id: String,
    team_id: String,
    topic: String,
    mode: String,
}

impl ApnsConfig {
    /// Create new APNs configuration
    pub fn new(
        key: KeySource,
        key_id: impl Into<String>,
        team_id: impl Into<String>,
        topic: impl Into<String>,
        mode: impl Into<String>,
    ) -> Self {
        Self {
            key,
            key_id: key_id.into(),
            team_id: team_id.into(),
            topic: topic.into(),
            mode: mode.into(),
        }
    }

    /// Load configuration from `APNS_*` environment variables
    ///
    /// **Environment Variables**:
    /// - `APNS_P8_CERTIFICATE`: inline PEM key (takes precedence)
    /// - `APNS_P8_CERTIFICATE_FILE_PATH`: path to the `.p8` key
    /// - `APNS_KEY_ID`, `APNS_TEAM_ID`: token credentials
    /// - `APNS_TOPIC`: bundle id used for routing
    /// - `APNS_MODE`: `production` or `development`
    pub fn from_env() -> Result<Self, ApnsError> {
        dotenvy::dotenv().ok();

        let env: ApnsEnv = envy::prefixed("APNS_")
            .from_env()
            .map_err(|e| ApnsError::Config(e.to_string()))?;

        let key = match (env.p8_certificate, env.p8_certificate_file_path) {
            (Some(pem), _) if !pem.is_empty() => KeySource::Inline(pem.into_bytes()),
            (_, Some(path)) if !path.is_empty() => KeySource::File(PathBuf::from(path)),
            _ => {
                return Err(ApnsError::Config(
                    "one of APNS_P8_CERTIFICATE or APNS_P8_CERTIFICATE_FILE_PATH must be set"
                        .to_string(),
                ))
            }
        };

        Ok(Self::new(key, env.key_id, env.team_id, env.topic, env.mode))
    }
}
