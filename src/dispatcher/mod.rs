//! Directive dispatcher
//!
//! `Dispatcher` routes one directive to discovery, toggle or the error
//! envelope. It owns no mutable state: configuration is immutable and
//! the publisher and id generator are shared collaborators, so one
//! dispatcher can serve concurrent invocations.

pub mod toggle;
pub mod unsupported;

use crate::config::SkillConfig;
use crate::discovery::{self, DiscoveryResponse};
use crate::error::Result;
use crate::id::{MessageIdGenerator, UuidGenerator};
use crate::provider::MessagePublisher;
use crate::types::{DirectiveEnvelope, DirectiveName, ErrorResponse, Response, ToggleResponse};
use std::sync::Arc;

pub use unsupported::{INTERNAL_ERROR, UNSUPPORTED_DIRECTIVE};

/// Routes directives and builds responses
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<SkillConfig>,

    publisher: Arc<dyn MessagePublisher>,

    ids: Arc<dyn MessageIdGenerator>,
}

impl Dispatcher {
    /// Create a dispatcher with random UUID message ids
    pub fn new(config: SkillConfig, publisher: Arc<dyn MessagePublisher>) -> Self {
        Self {
            config: Arc::new(config),
            publisher,
            ids: Arc::new(UuidGenerator),
        }
    }

    /// Replace the message id source
    pub fn with_id_generator(mut self, ids: Arc<dyn MessageIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn config(&self) -> &SkillConfig {
        &self.config
    }

    /// Name of the publisher backend in use
    pub fn publisher_name(&self) -> &str {
        self.publisher.name()
    }

    /// Handle one raw directive document
    ///
    /// Logs the full directive and the full response as pretty-printed
    /// JSON. Fails on documents that are not JSON objects, on toggles
    /// without an endpoint id, and on publish failures.
    pub async fn handle(&self, event: &serde_json::Value) -> Result<Response> {
        tracing::info!("Directive received:\n{}", serde_json::to_string_pretty(event)?);

        let envelope = DirectiveEnvelope::from_value(event)?;
        let response = self.dispatch(&envelope).await?;

        tracing::info!(
            "Response:\n{}",
            serde_json::to_string_pretty(&response)?
        );
        Ok(response)
    }

    /// Route a parsed directive
    pub async fn dispatch(&self, envelope: &DirectiveEnvelope) -> Result<Response> {
        let response = match envelope.name() {
            DirectiveName::Discover => Response::Discovery(self.discovery()),
            DirectiveName::TurnOn | DirectiveName::TurnOff => {
                Response::Toggle(self.toggle(envelope).await?)
            }
            DirectiveName::Unknown(name) => {
                tracing::warn!(name = ?name, "Unsupported directive");
                Response::Error(self.error(UNSUPPORTED_DIRECTIVE))
            }
        };
        Ok(response)
    }

    /// Publish the toggle pulse and acknowledge it
    pub async fn toggle(&self, envelope: &DirectiveEnvelope) -> Result<ToggleResponse> {
        let endpoint_id = envelope.endpoint_id()?;
        let instance = envelope.instance()?;
        let correlation_token = envelope.correlation_token()?;
        let message = toggle::publish_message(endpoint_id);

        tracing::info!(
            endpoint_id = %endpoint_id,
            topic = %message.topic,
            directive = envelope.name().as_str(),
            "Toggling garage door"
        );

        self.publisher.publish(&message).await?;

        Ok(toggle::acknowledgment(
            endpoint_id,
            instance,
            correlation_token,
            self.ids.next_id(),
        ))
    }

    /// Describe both doors
    pub fn discovery(&self) -> DiscoveryResponse {
        tracing::info!("Sending discovery response");
        discovery::discovery_response(&self.config, self.ids.next_id())
    }

    /// Error envelope with the given message
    pub fn error(&self, message: &str) -> ErrorResponse {
        unsupported::error_response(message, self.ids.next_id())
    }
}
