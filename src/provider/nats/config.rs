//! NATS publisher configuration

use serde::{Deserialize, Serialize};

/// Connection settings for the NATS backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NatsConfig {
    /// Server URL (e.g., "nats://127.0.0.1:4222")
    pub url: String,

    /// Connection name reported to the server
    pub name: String,

    /// Optional auth token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Request/flush timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: "nats://127.0.0.1:4222".to_string(),
            name: "garage-skill".to_string(),
            token: None,
            connect_timeout_secs: 5,
            request_timeout_secs: 10,
        }
    }
}

impl NatsConfig {
    /// Map a slash-separated bus topic onto a NATS subject
    ///
    /// `garage/toggle/left` becomes `garage.toggle.left`.
    pub fn subject_for(&self, topic: &str) -> String {
        topic.replace('/', ".")
    }
}
