//! NATS message publisher
//!
//! Implements `MessagePublisher` over a core NATS connection.

mod client;
mod config;

pub use client::NatsClient;
pub use config::NatsConfig;

use crate::error::Result;
use crate::provider::{MessagePublisher, PublishMessage};
use async_trait::async_trait;

/// NATS message publisher
///
/// Wraps `NatsClient` and implements the `MessagePublisher` trait.
pub struct NatsPublisher {
    client: NatsClient,
}

impl NatsPublisher {
    /// Connect to NATS
    pub async fn connect(config: NatsConfig) -> Result<Self> {
        let client = NatsClient::connect(config).await?;
        Ok(Self { client })
    }

    /// Get the underlying NATS client for advanced usage
    pub fn client(&self) -> &NatsClient {
        &self.client
    }
}

#[async_trait]
impl MessagePublisher for NatsPublisher {
    async fn publish(&self, message: &PublishMessage) -> Result<()> {
        self.client.publish(message).await
    }

    fn name(&self) -> &str {
        "nats"
    }
}
