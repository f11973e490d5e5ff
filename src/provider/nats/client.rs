//! NATS client — connect and publish

use super::config::NatsConfig;
use crate::error::{Result, SkillError};
use crate::provider::{PublishMessage, QoS};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

/// NATS core client
///
/// Publishes without JetStream: a core publish is fire-and-forget,
/// which is exactly QoS 0. QoS 1 additionally flushes the connection
/// so the server has received the message before returning.
pub struct NatsClient {
    client: async_nats::Client,

    config: Arc<NatsConfig>,
}

impl NatsClient {
    /// Connect to the NATS server
    pub async fn connect(config: NatsConfig) -> Result<Self> {
        let connect_opts = build_connect_options(&config);

        let client = connect_opts
            .connect(&config.url)
            .await
            .map_err(|e| SkillError::Connection(format!("{}: {}", config.url, e)))?;

        tracing::info!(url = %config.url, "Connected to NATS");

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Publish one message
    pub async fn publish(&self, message: &PublishMessage) -> Result<()> {
        let subject = self.config.subject_for(&message.topic);

        self.client
            .publish(subject.clone(), Bytes::from(message.payload.clone()))
            .await
            .map_err(|e| SkillError::Publish {
                topic: message.topic.clone(),
                reason: e.to_string(),
            })?;

        if message.qos == QoS::AtLeastOnce {
            self.client.flush().await.map_err(|e| SkillError::Publish {
                topic: message.topic.clone(),
                reason: format!("flush failed: {}", e),
            })?;
        }

        tracing::debug!(
            topic = %message.topic,
            subject = %subject,
            qos = message.qos.level(),
            "Message published"
        );

        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &NatsConfig {
        &self.config
    }
}

/// Build NATS connect options from config
fn build_connect_options(config: &NatsConfig) -> async_nats::ConnectOptions {
    let mut opts = async_nats::ConnectOptions::new()
        .name(config.name.clone())
        .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
        .request_timeout(Some(Duration::from_secs(config.request_timeout_secs)));

    if let Some(ref token) = config.token {
        opts = opts.token(token.clone());
    }

    opts
}
