//! # garage-skill
//!
//! Voice-assistant smart-home adapter for a two-door garage.
//!
//! ## Overview
//!
//! `garage-skill` answers smart-home directives (payload version 3).
//! Discovery describes two toggle endpoints, `garage-left` and
//! `garage-right`. TurnOn and TurnOff both publish `ON` to
//! `garage/toggle/<side>`, where a door controller listens and pulses
//! the opener.
//!
//! ## Quick Start
//!
//! ```rust
//! use garage_skill::{Dispatcher, MemoryPublisher, Response, SkillConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> garage_skill::Result<()> {
//! let publisher = Arc::new(MemoryPublisher::new());
//! let dispatcher = Dispatcher::new(SkillConfig::default(), publisher.clone());
//!
//! let response = dispatcher
//!     .handle(&serde_json::json!({
//!         "directive": {
//!             "header": { "name": "TurnOn", "instance": "left", "correlationToken": "abc" },
//!             "endpoint": { "endpointId": "garage-left" }
//!         }
//!     }))
//!     .await?;
//!
//! assert!(matches!(response, Response::Toggle(_)));
//! assert_eq!(publisher.last().unwrap().topic, "garage/toggle/left");
//! # Ok(())
//! # }
//! ```
//!
//! ## Publishers
//!
//! - **iot** — AWS IoT data plane over HTTPS (SigV4-signed)
//! - **nats** — core NATS, fire-and-forget
//! - **memory** — records messages, for local runs and tests
//!
//! ## Architecture
//!
//! - **Dispatcher** — routes a directive and builds the response
//! - **MessagePublisher** trait — the seam to the message bus
//! - **MessageIdGenerator** trait — response message ids
//! - **SkillConfig** — display category, manufacturer, publisher backend

pub mod config;
pub mod discovery;
pub mod dispatcher;
pub mod error;
pub mod id;
pub mod provider;
pub mod server;
pub mod types;

// Re-export core types
pub use config::{DisplayCategory, PublisherConfig, SkillConfig};
pub use discovery::DiscoveryResponse;
pub use dispatcher::{Dispatcher, INTERNAL_ERROR, UNSUPPORTED_DIRECTIVE};
pub use error::{Result, SkillError};
pub use id::{MessageIdGenerator, SequentialGenerator, UuidGenerator};
pub use provider::{LazyPublisher, MessagePublisher, PublishMessage, QoS};
pub use types::{
    DirectiveEnvelope, DirectiveName, ErrorResponse, Response, Side, ToggleResponse,
};

// Re-export publishers for convenience
pub use provider::iot::{Credentials, IotConfig, IotDataPublisher};
pub use provider::memory::MemoryPublisher;
pub use provider::nats::{NatsClient, NatsConfig, NatsPublisher};
