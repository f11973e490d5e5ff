//! In-memory message publisher
//!
//! Records every published message instead of sending it anywhere.
//! Used for local invocation and as the test double for the bus.

use crate::error::{Result, SkillError};
use crate::provider::{MessagePublisher, PublishMessage};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Messages kept when the memory backend is selected at runtime
pub const RUNTIME_CAPACITY: usize = 128;

/// Publisher that keeps messages in a queue
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    messages: RwLock<VecDeque<PublishMessage>>,

    /// Oldest messages are dropped beyond this many; unbounded when `None`
    capacity: Option<usize>,

    /// When set, every publish fails like an unreachable broker
    failing: AtomicBool,
}

impl MemoryPublisher {
    /// Unbounded publisher, for tests
    pub fn new() -> Self {
        Self::default()
    }

    /// Publisher keeping only the most recent `capacity` messages
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    /// Make subsequent publishes fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages published so far, oldest first
    pub fn messages(&self) -> Vec<PublishMessage> {
        self.messages
            .read()
            .map(|m| m.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.messages.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<PublishMessage> {
        self.messages.read().ok()?.back().cloned()
    }
}

#[async_trait]
impl MessagePublisher for MemoryPublisher {
    async fn publish(&self, message: &PublishMessage) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SkillError::Publish {
                topic: message.topic.clone(),
                reason: "memory publisher set to fail".to_string(),
            });
        }

        let mut messages = self.messages.write().map_err(|_| SkillError::Publish {
            topic: message.topic.clone(),
            reason: "message log poisoned".to_string(),
        })?;
        if let Some(capacity) = self.capacity {
            while messages.len() >= capacity {
                messages.pop_front();
            }
        }
        messages.push_back(message.clone());
        drop(messages);

        tracing::debug!(topic = %message.topic, "Message recorded");
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::QoS;

    #[tokio::test]
    async fn test_records_messages_in_order() {
        let publisher = MemoryPublisher::new();
        assert!(publisher.is_empty());

        publisher
            .publish(&PublishMessage::new("garage/toggle/left", QoS::AtMostOnce, "ON"))
            .await
            .unwrap();
        publisher
            .publish(&PublishMessage::new("garage/toggle/right", QoS::AtMostOnce, "ON"))
            .await
            .unwrap();

        let messages = publisher.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].topic, "garage/toggle/left");
        assert_eq!(publisher.last().unwrap().topic, "garage/toggle/right");
    }

    #[tokio::test]
    async fn test_failing_mode() {
        let publisher = MemoryPublisher::new();
        publisher.set_failing(true);

        let err = publisher
            .publish(&PublishMessage::new("garage/toggle/left", QoS::AtMostOnce, "ON"))
            .await
            .unwrap_err();
        assert!(matches!(err, SkillError::Publish { ref topic, .. } if topic == "garage/toggle/left"));
        assert!(publisher.is_empty());

        publisher.set_failing(false);
        publisher
            .publish(&PublishMessage::new("garage/toggle/left", QoS::AtMostOnce, "ON"))
            .await
            .unwrap();
        assert_eq!(publisher.len(), 1);
    }

    #[tokio::test]
    async fn test_bounded_keeps_most_recent() {
        let publisher = MemoryPublisher::bounded(3);
        for side in ["a", "b", "c", "d", "e"] {
            publisher
                .publish(&PublishMessage::new(
                    format!("garage/toggle/{}", side),
                    QoS::AtMostOnce,
                    "ON",
                ))
                .await
                .unwrap();
        }

        let topics: Vec<String> = publisher.messages().into_iter().map(|m| m.topic).collect();
        assert_eq!(
            topics,
            vec!["garage/toggle/c", "garage/toggle/d", "garage/toggle/e"]
        );
        assert_eq!(publisher.last().unwrap().topic, "garage/toggle/e");
    }
}
