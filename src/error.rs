//! Error types for garage-skill

use thiserror::Error;

/// Errors that fail a directive invocation
///
/// Unsupported directives are not errors: they are answered with an
/// `ErrorResponse` envelope. Everything here surfaces to the caller as
/// an invocation-level failure.
#[derive(Debug, Error)]
pub enum SkillError {
    /// A field the handler needs is missing from the directive envelope,
    /// or is not a string
    #[error("Malformed directive: field '{field}' is missing or not a string")]
    MalformedDirective { field: String },

    /// Publish failure
    #[error("Failed to publish to topic '{topic}': {reason}")]
    Publish { topic: String, reason: String },

    /// Broker connection failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Signing credentials unavailable
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP host failure
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Config file parse failure
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Environment variable parse failure
    #[error("Environment error: {0}")]
    Env(#[from] envy::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkillError {
    /// Shorthand for a missing or mistyped directive field
    pub fn malformed(field: impl Into<String>) -> Self {
        Self::MalformedDirective {
            field: field.into(),
        }
    }
}

/// Result type alias for skill operations
pub type Result<T> = std::result::Result<T, SkillError>;

impl axum::response::IntoResponse for SkillError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::response::IntoResponse;

        tracing::error!(error = %self, "Directive invocation failed");
        let body = serde_json::json!({ "error": self.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
