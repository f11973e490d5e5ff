//! Error envelope for directives the dispatcher does not route

use crate::types::{
    ErrorEvent, ErrorPayload, ErrorResponse, Header, ResponseEndpoint, ERROR_ENDPOINT_ID,
    PAYLOAD_VERSION,
};

/// Message reported for every unrouted directive
pub const UNSUPPORTED_DIRECTIVE: &str = "unsupported directive";

/// Error type reported to the voice assistant
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

pub fn error_response(message: &str, message_id: String) -> ErrorResponse {
    ErrorResponse {
        event: ErrorEvent {
            header: Header {
                namespace: "Alexa".to_string(),
                name: "ErrorResponse".to_string(),
                message_id,
                payload_version: PAYLOAD_VERSION.to_string(),
            },
            endpoint: ResponseEndpoint {
                endpoint_id: ERROR_ENDPOINT_ID.to_string(),
            },
            payload: ErrorPayload {
                kind: INTERNAL_ERROR.to_string(),
                message: message.to_string(),
            },
        },
    }
}
