//! Message publisher trait — the seam between the dispatcher and the bus
//!
//! All message-bus backends (AWS IoT data plane, NATS, in-memory)
//! implement `MessagePublisher` so the dispatcher never depends on a
//! concrete network client.

use crate::config::PublisherConfig;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;

pub mod iot;
pub mod memory;
pub mod nats;

/// Delivery guarantee requested for a publish
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum QoS {
    /// At most once, no broker acknowledgment
    #[default]
    AtMostOnce,
    /// At least once
    AtLeastOnce,
}

impl QoS {
    /// Numeric level used on the wire (0 or 1)
    pub fn level(&self) -> u8 {
        match self {
            QoS::AtMostOnce => 0,
            QoS::AtLeastOnce => 1,
        }
    }
}

impl From<QoS> for u8 {
    fn from(qos: QoS) -> u8 {
        qos.level()
    }
}

impl TryFrom<u8> for QoS {
    type Error = String;

    fn try_from(level: u8) -> std::result::Result<Self, Self::Error> {
        match level {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            other => Err(format!("unsupported QoS level {}", other)),
        }
    }
}

/// A single message for the bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishMessage {
    pub topic: String,
    pub qos: QoS,
    pub payload: String,
}

impl PublishMessage {
    pub fn new(topic: impl Into<String>, qos: QoS, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            qos,
            payload: payload.into(),
        }
    }
}

/// Core trait for message-bus backends
///
/// A publish either completes or fails; callers do not retry.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publish one message
    async fn publish(&self, message: &PublishMessage) -> Result<()>;

    /// Backend name (e.g., "iot", "nats", "memory")
    fn name(&self) -> &str;
}

/// Build the backend selected by configuration
pub async fn connect(config: &PublisherConfig) -> Result<Arc<dyn MessagePublisher>> {
    let publisher: Arc<dyn MessagePublisher> = match config {
        PublisherConfig::Iot(iot_config) => {
            Arc::new(iot::IotDataPublisher::from_env(iot_config.clone())?)
        }
        PublisherConfig::Nats(nats_config) => {
            Arc::new(nats::NatsPublisher::connect(nats_config.clone()).await?)
        }
        PublisherConfig::Memory => Arc::new(memory::MemoryPublisher::bounded(
            memory::RUNTIME_CAPACITY,
        )),
    };

    tracing::info!(backend = publisher.name(), "Message publisher ready");
    Ok(publisher)
}

/// Publisher that connects its backend on the first publish
///
/// Directives that never publish (discovery, unsupported names) work
/// without a reachable or fully configured bus. A failed connect is not
/// cached, so the next publish tries again.
pub struct LazyPublisher {
    config: PublisherConfig,

    inner: OnceCell<Arc<dyn MessagePublisher>>,
}

impl LazyPublisher {
    pub fn new(config: PublisherConfig) -> Self {
        Self {
            config,
            inner: OnceCell::new(),
        }
    }

    /// Whether the backend has been connected yet
    pub fn is_connected(&self) -> bool {
        self.inner.initialized()
    }

    async fn backend(&self) -> Result<&Arc<dyn MessagePublisher>> {
        self.inner.get_or_try_init(|| connect(&self.config)).await
    }
}

#[async_trait]
impl MessagePublisher for LazyPublisher {
    async fn publish(&self, message: &PublishMessage) -> Result<()> {
        self.backend().await?.publish(message).await
    }

    fn name(&self) -> &str {
        self.config.backend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qos_levels() {
        assert_eq!(QoS::AtMostOnce.level(), 0);
        assert_eq!(QoS::AtLeastOnce.level(), 1);
        assert_eq!(QoS::default(), QoS::AtMostOnce);
        assert_eq!(QoS::try_from(1).unwrap(), QoS::AtLeastOnce);
        assert!(QoS::try_from(2).is_err());
    }

    #[test]
    fn test_publish_message_serialization() {
        let message = PublishMessage::new("garage/toggle/left", QoS::AtMostOnce, "ON");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"topic": "garage/toggle/left", "qos": 0, "payload": "ON"})
        );
    }

    #[tokio::test]
    async fn test_connect_memory_backend() {
        let publisher = connect(&PublisherConfig::Memory).await.unwrap();
        assert_eq!(publisher.name(), "memory");
        publisher
            .publish(&PublishMessage::new("garage/toggle/right", QoS::AtMostOnce, "ON"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_lazy_publisher_connects_on_first_publish() {
        let publisher = LazyPublisher::new(PublisherConfig::Memory);
        assert_eq!(publisher.name(), "memory");
        assert!(!publisher.is_connected());

        publisher
            .publish(&PublishMessage::new("garage/toggle/left", QoS::AtMostOnce, "ON"))
            .await
            .unwrap();
        assert!(publisher.is_connected());
    }

    #[tokio::test]
    async fn test_lazy_publisher_reports_connect_errors_on_publish() {
        // Default IoT config has no endpoint
        let publisher = LazyPublisher::new(PublisherConfig::default());
        assert_eq!(publisher.name(), "iot");

        let message = PublishMessage::new("garage/toggle/left", QoS::AtMostOnce, "ON");
        assert!(publisher.publish(&message).await.is_err());
        assert!(publisher.publish(&message).await.is_err());
        assert!(!publisher.is_connected());
    }
}
