//! Message API connection configuration
//!
//! Supports explicit construction and environment-based loading.
use std::time::Duration;

use serde::Deserialize;
use tonic::transport::{ClientTlsConfig, Endpoint};
use tracing::{info, warn};

use crate::error::ClientError;
use crate::interceptor::VersionMetadataInterceptor;
use crate::v1::message_api_client;
use crate::MessageApiClient;

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageApiConfig {
    /// `host:port`, optionally prefixed with `http://` or `https://`
    pub address: String,

    /// Encrypt the connection and validate the server certificate
    #[serde(default)]
    pub use_tls: bool,

    /// Sent as `x-client-version` on every call
    #[serde(default)]
    pub client_version: String,

    /// Sent as `x-app-version` on every call
    #[serde(default)]
    pub app_version: String,

    /// TCP/TLS connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl MessageApiConfig {
    pub fn new(
        address: impl Into<String>,
        use_tls: bool,
        client_version: impl Into<String>,
        app_version: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            use_tls,
            client_version: client_version.into(),
            app_version: app_version.into(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from `MESSAGE_API_*` environment variables
    ///
    /// **Environment Variables**:
    /// - `MESSAGE_API_ADDRESS`: `host:port` of the API (required)
    /// - `MESSAGE_API_USE_TLS`: `true` / `false` (default: false)
    /// - `MESSAGE_API_CLIENT_VERSION`, `MESSAGE_API_APP_VERSION`
    /// - `MESSAGE_API_CONNECT_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        envy::prefixed("MESSAGE_API_")
            .from_env()
            .map_err(|e| ClientError::Config(e.to_string()))
    }

    /// URI handed to tonic, with the scheme implied by `use_tls`
    pub fn uri(&self) -> Result<String, ClientError> {
        let expected = if self.use_tls { "https" } else { "http" };

        match self.address.split_once("://") {
            None => Ok(format!("{expected}://{}", self.address)),
            Some((scheme, _)) if scheme == expected => Ok(self.address.clone()),
            Some((scheme, _)) => Err(ClientError::InvalidAddress {
                address: self.address.clone(),
                reason: format!("scheme {scheme:?} conflicts with use_tls={}", self.use_tls),
            }),
        }
    }

    /// Build a tonic Endpoint with connect timeout and optional TLS
    pub fn make_endpoint(&self) -> Result<Endpoint, ClientError> {
        let uri = self.uri()?;

        let endpoint = Endpoint::from_shared(uri)
            .map_err(|e| ClientError::InvalidAddress {
                address: self.address.clone(),
                reason: e.to_string(),
            })?
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .tcp_nodelay(true);

        if !self.use_tls {
            return Ok(endpoint);
        }

        // Server certificate is validated against the host trust store plus
        // the bundled web PKI roots; no pinning.
        let tls = ClientTlsConfig::new().with_native_roots().with_webpki_roots();
        match endpoint.clone().tls_config(tls) {
            Ok(endpoint) => Ok(endpoint),
            Err(e) => {
                warn!(
                    address = %self.address,
                    error = %e,
                    "Host trust store unavailable, using bundled web PKI roots"
                );
                endpoint
                    .tls_config(ClientTlsConfig::new().with_webpki_roots())
                    .map_err(|source| ClientError::Tls {
                        address: self.address.clone(),
                        source,
                    })
            }
        }
    }

    /// Dial the API and wrap the channel in a typed, version-stamped client
    pub async fn connect(&self) -> Result<MessageApiClient, ClientError> {
        let interceptor = VersionMetadataInterceptor::new(&self.client_version, &self.app_version)?;
        let endpoint = self.make_endpoint()?;

        let channel = endpoint.connect().await.map_err(|source| {
            warn!(
                address = %self.address,
                tls = self.use_tls,
                error = %source,
                "Failed to connect to message API"
            );
            ClientError::Connect {
                address: self.address.clone(),
                source,
            }
        })?;

        info!(
            address = %self.address,
            tls = self.use_tls,
            client_version = %self.client_version,
            app_version = %self.app_version,
            "Connected to message API"
        );

        Ok(message_api_client::MessageApiClient::with_interceptor(
            channel,
            interceptor,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "MESSAGE_API_ADDRESS",
        "MESSAGE_API_USE_TLS",
        "MESSAGE_API_CLIENT_VERSION",
        "MESSAGE_API_APP_VERSION",
        "MESSAGE_API_CONNECT_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_uri_scheme_follows_tls_flag() {
        let plain = MessageApiConfig::new("localhost:5556", false, "1.0.0", "2.0.0");
        let tls = MessageApiConfig::new("production.xmtp.network:443", true, "1.0.0", "2.0.0");

        assert_eq!(plain.uri().unwrap(), "http://localhost:5556");
        assert_eq!(tls.uri().unwrap(), "https://production.xmtp.network:443");
    }

    #[test]
    fn test_uri_keeps_matching_scheme() {
        let cfg = MessageApiConfig::new("https://api.example.com:443", true, "", "");
        assert_eq!(cfg.uri().unwrap(), "https://api.example.com:443");
    }

    #[test]
    fn test_uri_rejects_conflicting_scheme() {
        let cfg = MessageApiConfig::new("https://api.example.com:443", false, "", "");
        assert!(matches!(cfg.uri(), Err(ClientError::InvalidAddress { .. })));
    }

    #[test]
    fn test_make_endpoint_rejects_malformed_address() {
        let cfg = MessageApiConfig::new("not a host:port", false, "", "");
        assert!(matches!(
            cfg.make_endpoint(),
            Err(ClientError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_make_endpoint_with_tls() {
        let cfg = MessageApiConfig::new("api.example.com:443", true, "", "");
        assert!(cfg.make_endpoint().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        std::env::set_var("MESSAGE_API_ADDRESS", "localhost:5556");
        std::env::set_var("MESSAGE_API_USE_TLS", "true");
        std::env::set_var("MESSAGE_API_CLIENT_VERSION", "notifications/1.0.0");
        std::env::set_var("MESSAGE_API_APP_VERSION", "0.3.1");

        let cfg = MessageApiConfig::from_env().unwrap();
        assert_eq!(cfg.address, "localhost:5556");
        assert!(cfg.use_tls);
        assert_eq!(cfg.client_version, "notifications/1.0.0");
        assert_eq!(cfg.app_version, "0.3.1");
        assert_eq!(cfg.connect_timeout_secs, 10);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        std::env::set_var("MESSAGE_API_ADDRESS", "localhost:5556");
        std::env::set_var("MESSAGE_API_CONNECT_TIMEOUT_SECS", "3");

        let cfg = MessageApiConfig::from_env().unwrap();
        assert!(!cfg.use_tls);
        assert_eq!(cfg.client_version, "");
        assert_eq!(cfg.connect_timeout_secs, 3);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_address() {
        clear_env();

        let result = MessageApiConfig::from_env();
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
