//! Message API client factory
//!
//! Builds a typed gRPC client for the XMTP Message API (v1). Every call made
//! through the returned client carries the caller's `x-client-version` and
//! `x-app-version` metadata.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use message_api_client::{new_client, v1::QueryRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = new_client("localhost:5556", false, "notifications/0.1.0", "0.1.0").await?;
//!
//! let response = client
//!     .query(QueryRequest {
//!         content_topics: vec!["/xmtp/0/intro-0x1234/proto".to_string()],
//!         ..Default::default()
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! The caller owns the returned client; dropping the last clone closes the
//! connection.
pub mod config;
pub mod error;
pub mod interceptor;

pub mod xmtp {
    pub mod message_api {
        pub mod v1 {
            tonic::include_proto!("xmtp.message_api.v1");
        }
    }
}

pub use config::MessageApiConfig;
pub use error::ClientError;
pub use interceptor::{
    VersionMetadataInterceptor, APP_VERSION_METADATA_KEY, CLIENT_VERSION_METADATA_KEY,
};
pub use xmtp::message_api::v1;

use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;

/// Typed Message API client with version metadata attached to every call
pub type MessageApiClient =
    v1::message_api_client::MessageApiClient<InterceptedService<Channel, VersionMetadataInterceptor>>;

/// Connect to the Message API at `address`
///
/// `use_tls` selects TLS with server certificate validation; otherwise the
/// connection is plaintext HTTP/2. Both version strings are attached to every
/// call. Dropping the returned future cancels the dial.
pub async fn new_client(
    address: &str,
    use_tls: bool,
    client_version: &str,
    app_version: &str,
) -> Result<MessageApiClient, ClientError> {
    MessageApiConfig::new(address, use_tls, client_version, app_version)
        .connect()
        .await
}
