use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::payload::DeliveryResult;

/// Error type for APNs operations
///
/// Configuration variants are only produced while constructing an
/// [`ApnsDelivery`](crate::ApnsDelivery); the remaining variants are per-send
/// and leave the sender usable.
#[derive(Debug, Error)]
pub enum ApnsError {
    #[error("APNs configuration error: {0}")]
    Config(String),

    #[error("failed to read APNs key from {}: {source}", path.display())]
    KeyRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode APNs signing key: {0}")]
    KeyDecode(String),

    #[error("invalid APNs mode: {0:?}")]
    InvalidMode(String),

    #[error("APNs delivery timed out after {0:?}")]
    Timeout(Duration),

    #[error("APNs rejected notification (status {}, reason {})", .0.status_code, .0.reason)]
    Rejected(DeliveryResult),

    #[error("APNs provider error: {0}")]
    Provider(#[source] a2::Error),
}

impl ApnsError {
    /// True for errors that can only happen while building a sender
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ApnsError::Config(_)
                | ApnsError::KeyRead { .. }
                | ApnsError::KeyDecode(_)
                | ApnsError::InvalidMode(_)
        )
    }
}
