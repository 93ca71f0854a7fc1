use thiserror::Error;

/// Errors produced while building a message API client
///
/// No partially-built client is ever returned alongside one of these.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid message API address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("invalid value for {key} metadata: {value:?}")]
    InvalidMetadata { key: &'static str, value: String },

    #[error("failed to configure TLS for {address}: {source}")]
    Tls {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("failed to connect to message API at {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("message API configuration error: {0}")]
    Config(String),
}
