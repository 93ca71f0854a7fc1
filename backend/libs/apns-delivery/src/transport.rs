use std::io::Cursor;

use a2::request::payload::Payload;
use a2::{
    Client, ClientConfig, DefaultNotificationBuilder, Endpoint, NotificationBuilder,
    NotificationOptions, Response,
};

use crate::config::ApnsMode;
use crate::error::ApnsError;
use crate::payload::{DeliveryResult, PushNotification, MESSAGE_FIELD, TOPIC_FIELD};

/// Submits a finished notification to a push gateway
#[async_trait::async_trait]
pub trait PushTransport: Send + Sync {
    /// Push one notification
    ///
    /// A gateway rejection is reported as `Err(ApnsError::Rejected(..))` so the
    /// caller still sees the gateway's id, status and reason.
    async fn push(&self, notification: &PushNotification) -> Result<DeliveryResult, ApnsError>;
}

/// Token-authenticated HTTP/2 transport backed by the `a2` client
pub struct A2Transport {
    client: Client,
}

impl A2Transport {
    /// Build a client that signs provider tokens with `key_pem`
    ///
    /// The `.p8` key must be a PKCS#8 PEM document; anything the signer cannot
    /// load is reported as [`ApnsError::KeyDecode`].
    pub fn new(
        key_pem: &[u8],
        key_id: &str,
        team_id: &str,
        mode: ApnsMode,
    ) -> Result<Self, ApnsError> {
        let endpoint = match mode {
            ApnsMode::Production => Endpoint::Production,
            ApnsMode::Development => Endpoint::Sandbox,
        };

        let client = Client::token(
            &mut Cursor::new(key_pem),
            key_id,
            team_id,
            ClientConfig::new(endpoint),
        )
        .map_err(|e| ApnsError::KeyDecode(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl PushTransport for A2Transport {
    async fn push(&self, notification: &PushNotification) -> Result<DeliveryResult, ApnsError> {
        let request = build_request(notification)?;

        match self.client.send(request).await {
            Ok(response) => Ok(delivery_result(&response)),
            Err(a2::Error::ResponseError(response)) => {
                Err(ApnsError::Rejected(delivery_result(&response)))
            }
            Err(e) => Err(ApnsError::Provider(e)),
        }
    }
}

/// Render a notification as the `a2` request sent on the wire
fn build_request(notification: &PushNotification) -> Result<Payload<'_>, ApnsError> {
    let payload = &notification.payload;

    let mut builder = DefaultNotificationBuilder::new().set_body(&payload.alert);
    if payload.mutable_content {
        builder = builder.set_mutable_content();
    }

    let options = NotificationOptions {
        apns_topic: Some(&notification.apns_topic),
        ..Default::default()
    };

    let mut request = builder.build(&notification.device_token, options);
    request
        .add_custom_data(TOPIC_FIELD, &payload.topic)
        .map_err(ApnsError::Provider)?;
    request
        .add_custom_data(MESSAGE_FIELD, &payload.message)
        .map_err(ApnsError::Provider)?;

    Ok(request)
}

fn delivery_result(response: &Response) -> DeliveryResult {
    DeliveryResult {
        apns_id: response.apns_id.clone().unwrap_or_default(),
        status_code: response.code,
        reason: response
            .error
            .as_ref()
            .map(|body| format!("{:?}", body.reason))
            .unwrap_or_default(),
    }
}
