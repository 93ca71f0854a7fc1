//! APNs Delivery Library
//!
//! Sends "new message" alerts to iOS devices through the Apple Push
//! Notification service using token (`.p8`) authentication.
//!
//! It handles:
//! - Loading the signing key from inline material or a file path
//! - Validating the delivery environment (production / development)
//! - Building the mutable-content payload that carries topic and message
//! - Bounding every submission with a fixed timeout
//! - Logging the gateway's answer for each delivery
//!
//! ## Usage
//!
//! ```rust,no_run
//! use apns_delivery::{ApnsConfig, ApnsDelivery, PushDelivery};
//!
//! # async fn example() -> Result<(), apns_delivery::ApnsError> {
//! let config = ApnsConfig::from_env()?;
//! let delivery = ApnsDelivery::new(&config)?;
//!
//! delivery
//!     .send("a1b2c3d4e5f6", "/xmtp/0/dm-abc/proto", "ciphertext")
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Topics
//!
//! `send` takes a per-call `topic`, but the notification is always routed with
//! the topic from [`ApnsConfig`] (the app bundle id). The per-call value only
//! travels inside the payload as the `topic` custom field.
pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod transport;

pub use client::{ApnsDelivery, PushDelivery, SEND_TIMEOUT};
pub use config::{ApnsConfig, ApnsMode, KeySource};
pub use error::ApnsError;
pub use payload::{DeliveryResult, PushNotification, PushPayload};
pub use transport::{A2Transport, PushTransport};
