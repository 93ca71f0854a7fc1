/// Alert shown when the device cannot (or does not) rewrite the notification
pub const ALERT_TEXT: &str = "New message from XMTP";

/// Custom payload key carrying the conversation topic
pub const TOPIC_FIELD: &str = "topic";

/// Custom payload key carrying the message body
pub const MESSAGE_FIELD: &str = "encryptedMessage";

/// Notification payload
///
/// `mutable_content` lets the notification service extension on the device
/// decrypt `message` before the alert is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushPayload {
    pub alert: String,
    pub mutable_content: bool,
    pub topic: String,
    pub message: String,
}

impl PushPayload {
    /// Payload announcing a new message on `topic`
    pub fn new_message(topic: &str, message: &str) -> Self {
        Self {
            alert: ALERT_TEXT.to_string(),
            mutable_content: true,
            topic: topic.to_string(),
            message: message.to_string(),
        }
    }
}

/// A single notification ready for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushNotification {
    pub device_token: String,
    /// Value of the `apns-topic` header
    pub apns_topic: String,
    pub payload: PushPayload,
}

/// Gateway answer for one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    pub apns_id: String,
    pub status_code: u16,
    pub reason: String,
}

impl DeliveryResult {
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_payload() {
        let payload = PushPayload::new_message("/xmtp/0/dm/proto", "opaque");

        assert_eq!(payload.alert, "New message from XMTP");
        assert!(payload.mutable_content);
        assert_eq!(payload.topic, "/xmtp/0/dm/proto");
        assert_eq!(payload.message, "opaque");
    }

    #[test]
    fn test_delivery_result_success() {
        let ok = DeliveryResult {
            apns_id: "id".to_string(),
            status_code: 200,
            reason: String::new(),
        };
        let gone = DeliveryResult {
            status_code: 410,
            reason: "Unregistered".to_string(),
            ..ok.clone()
        };

        assert!(ok.is_success());
        assert!(!gone.is_success());
    }
}
