use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::{ApnsConfig, ApnsMode};
use crate::error::ApnsError;
use crate::payload::{DeliveryResult, PushNotification, PushPayload};
use crate::transport::{A2Transport, PushTransport};

/// Upper bound for a single submission to the gateway
pub const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for push notification senders
#[async_trait::async_trait]
pub trait PushDelivery: Send + Sync {
    /// Sends a new-message notification to a device
    ///
    /// # Arguments
    /// * `device_token` - APNs device token
    /// * `topic` - Conversation topic, carried in the payload only
    /// * `message` - Message body, carried in the payload verbatim
    async fn send(
        &self,
        device_token: &str,
        topic: &str,
        message: &str,
    ) -> Result<DeliveryResult, ApnsError>;
}

/// Apple Push Notification Service (APNs) sender
///
/// Bound to one credential, one routing topic and one environment for its
/// whole lifetime. Cloning shares the underlying HTTP/2 client.
#[derive(Clone)]
pub struct ApnsDelivery {
    transport: Arc<dyn PushTransport>,
    topic: String,
    mode: ApnsMode,
}

impl ApnsDelivery {
    /// Creates a new APNs sender
    ///
    /// # Returns
    /// `Ok(ApnsDelivery)` if initialization succeeds; a configuration
    /// `ApnsError` if the key cannot be read or decoded, or the mode is invalid
    pub fn new(cfg: &ApnsConfig) -> Result<Self, ApnsError> {
        let key = cfg.key.load()?;
        let mode: ApnsMode = cfg.mode.parse()?;
        let key_pem = decode_signing_key(&key)?;

        let transport = A2Transport::new(key_pem.as_bytes(), &cfg.key_id, &cfg.team_id, mode)?;

        info!(
            topic = %cfg.topic,
            mode = %mode,
            endpoint = mode.endpoint(),
            "Initialized APNs client"
        );

        Ok(Self::with_transport(Arc::new(transport), cfg.topic.clone(), mode))
    }

    /// Creates a sender over an already-built transport
    pub fn with_transport(
        transport: Arc<dyn PushTransport>,
        topic: impl Into<String>,
        mode: ApnsMode,
    ) -> Self {
        Self {
            transport,
            topic: topic.into(),
            mode,
        }
    }

    /// Routing topic used for every notification
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn mode(&self) -> ApnsMode {
        self.mode
    }
}

#[async_trait::async_trait]
impl PushDelivery for ApnsDelivery {
    async fn send(
        &self,
        device_token: &str,
        topic: &str,
        message: &str,
    ) -> Result<DeliveryResult, ApnsError> {
        // TODO: define the message format; `message` is forwarded as-is until
        // the client-side decryption contract is settled.
        let notification = PushNotification {
            device_token: device_token.to_string(),
            apns_topic: self.topic.clone(),
            payload: PushPayload::new_message(topic, message),
        };

        let outcome = match timeout(SEND_TIMEOUT, self.transport.push(&notification)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ApnsError::Timeout(SEND_TIMEOUT)),
        };

        match &outcome {
            Ok(result) | Err(ApnsError::Rejected(result)) => {
                info!(
                    target: "delivery_service",
                    apns_id = %result.apns_id,
                    status_code = result.status_code,
                    reason = %result.reason,
                    "Sent notification"
                );
            }
            Err(e) => {
                let token_prefix = device_token.chars().take(8).collect::<String>();
                warn!(
                    target: "delivery_service",
                    token_prefix = %token_prefix,
                    error = %e,
                    "APNs send failed"
                );
            }
        }

        outcome
    }
}

/// Check that `key` is a PEM-encoded private key and normalize its encoding
fn decode_signing_key(key: &[u8]) -> Result<String, ApnsError> {
    let parsed = pem::parse(key).map_err(|e| ApnsError::KeyDecode(e.to_string()))?;

    if parsed.tag() != "PRIVATE KEY" {
        return Err(ApnsError::KeyDecode(format!(
            "expected a PRIVATE KEY block, found {}",
            parsed.tag()
        )));
    }

    Ok(pem::encode(&parsed))
}
