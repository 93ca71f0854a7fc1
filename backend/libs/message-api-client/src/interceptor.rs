//! Version metadata interceptor
//!
//! Stamps every outgoing call with the caller's build version and app version.

use tonic::metadata::AsciiMetadataValue;
use tonic::service::Interceptor;
use tonic::{Request, Status};

use crate::error::ClientError;

pub const CLIENT_VERSION_METADATA_KEY: &str = "x-client-version";
pub const APP_VERSION_METADATA_KEY: &str = "x-app-version";

/// Client-side interceptor that appends version headers to gRPC metadata
///
/// Values are parsed once at construction; the interceptor is cheap to clone
/// and never fails at call time.
#[derive(Debug, Clone)]
pub struct VersionMetadataInterceptor {
    client_version: AsciiMetadataValue,
    app_version: AsciiMetadataValue,
}

impl VersionMetadataInterceptor {
    /// Create a new interceptor
    ///
    /// ## Errors
    ///
    /// Returns [`ClientError::InvalidMetadata`] if either version contains
    /// characters that are not allowed in an ASCII metadata value.
    pub fn new(client_version: &str, app_version: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client_version: parse_value(CLIENT_VERSION_METADATA_KEY, client_version)?,
            app_version: parse_value(APP_VERSION_METADATA_KEY, app_version)?,
        })
    }

    pub fn client_version(&self) -> &AsciiMetadataValue {
        &self.client_version
    }

    pub fn app_version(&self) -> &AsciiMetadataValue {
        &self.app_version
    }
}

fn parse_value(key: &'static str, value: &str) -> Result<AsciiMetadataValue, ClientError> {
    AsciiMetadataValue::try_from(value).map_err(|_| ClientError::InvalidMetadata {
        key,
        value: value.to_string(),
    })
}

impl Interceptor for VersionMetadataInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let metadata = request.metadata_mut();
        metadata.append(CLIENT_VERSION_METADATA_KEY, self.client_version.clone());
        metadata.append(APP_VERSION_METADATA_KEY, self.app_version.clone());

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interceptor_injects_headers() {
        let mut interceptor = VersionMetadataInterceptor::new("1.2.3", "4.5.6").unwrap();

        let request = interceptor.call(Request::new(())).unwrap();
        let metadata = request.metadata();

        assert_eq!(
            metadata.get(CLIENT_VERSION_METADATA_KEY).unwrap().to_str().unwrap(),
            "1.2.3"
        );
        assert_eq!(
            metadata.get(APP_VERSION_METADATA_KEY).unwrap().to_str().unwrap(),
            "4.5.6"
        );
    }

    #[test]
    fn test_interceptor_keeps_existing_metadata() {
        let mut interceptor = VersionMetadataInterceptor::new("1.2.3", "4.5.6").unwrap();

        let mut request = Request::new(());
        request
            .metadata_mut()
            .insert("authorization", "Bearer token".parse().unwrap());

        let request = interceptor.call(request).unwrap();
        assert!(request.metadata().get("authorization").is_some());
        assert!(request.metadata().get(CLIENT_VERSION_METADATA_KEY).is_some());
    }

    #[test]
    fn test_empty_versions_allowed() {
        let interceptor = VersionMetadataInterceptor::new("", "").unwrap();
        assert_eq!(interceptor.client_version().to_str().unwrap(), "");
        assert_eq!(interceptor.app_version().to_str().unwrap(), "");
    }

    #[test]
    fn test_invalid_version_rejected() {
        let err = VersionMetadataInterceptor::new("1.0\n", "4.5.6").unwrap_err();

        match err {
            ClientError::InvalidMetadata { key, value } => {
                assert_eq!(key, CLIENT_VERSION_METADATA_KEY);
                assert_eq!(value, "1.0\n");
            }
            other => panic!("Expected InvalidMetadata, got {other:?}"),
        }
    }
}
