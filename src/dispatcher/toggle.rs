//! TurnOn/TurnOff handling

use crate::provider::{PublishMessage, QoS};
use crate::types::{
    toggle_topic, ContextProperty, CorrelatedHeader, Empty, ResponseEndpoint, Side,
    ToggleContext, ToggleEvent, ToggleResponse, PAYLOAD_VERSION, TOGGLE_INTERFACE,
    TOGGLE_PAYLOAD, TOGGLE_PROPERTY,
};

/// The message that toggles the door named by `endpoint_id`
///
/// Both TurnOn and TurnOff produce the same pulse: the controller
/// toggles the door, it does not drive it to a state. An endpoint id
/// naming neither side yields the bare `garage/toggle/` topic.
pub fn publish_message(endpoint_id: &str) -> PublishMessage {
    let side = Side::resolve(endpoint_id);
    if side.is_none() {
        tracing::warn!(endpoint_id = %endpoint_id, "Endpoint id names no door side");
    }
    PublishMessage::new(toggle_topic(side), QoS::AtMostOnce, TOGGLE_PAYLOAD)
}

/// Acknowledgment for a toggle; always reports `toggleState = "ON"`
pub fn acknowledgment(
    endpoint_id: &str,
    instance: Option<&str>,
    correlation_token: Option<&str>,
    message_id: String,
) -> ToggleResponse {
    ToggleResponse {
        event: ToggleEvent {
            header: CorrelatedHeader {
                namespace: "Alexa".to_string(),
                name: "Response".to_string(),
                message_id,
                correlation_token: correlation_token.map(str::to_string),
                payload_version: PAYLOAD_VERSION.to_string(),
            },
            endpoint: ResponseEndpoint {
                endpoint_id: endpoint_id.to_string(),
            },
            payload: Empty {},
        },
        context: ToggleContext {
            properties: vec![ContextProperty {
                namespace: TOGGLE_INTERFACE.to_string(),
                instance: instance.map(str::to_string),
                name: TOGGLE_PROPERTY.to_string(),
                value: TOGGLE_PAYLOAD.to_string(),
            }],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_message_per_side() {
        let left = publish_message("garage-left");
        assert_eq!(left.topic, "garage/toggle/left");
        assert_eq!(left.qos, QoS::AtMostOnce);
        assert_eq!(left.payload, "ON");

        assert_eq!(publish_message("garage-right").topic, "garage/toggle/right");
    }

    // Unresolved sides publish to the bare prefix rather than failing.
    // Whether this should become a validation error is still open.
    #[test]
    fn test_publish_message_unresolved_side() {
        let message = publish_message("garage-center");
        assert_eq!(message.topic, "garage/toggle/");
        assert_eq!(message.payload, "ON");
    }

    #[test]
    fn test_acknowledgment_json() {
        let response = acknowledgment("garage-left", Some("left"), Some("tok"), "m-1".to_string());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "event": {
                    "header": {
                        "namespace": "Alexa",
                        "name": "Response",
                        "messageId": "m-1",
                        "correlationToken": "tok",
                        "payloadVersion": "3"
                    },
                    "endpoint": { "endpointId": "garage-left" },
                    "payload": {}
                },
                "context": {
                    "properties": [{
                        "namespace": "Alexa.ToggleController",
                        "instance": "left",
                        "name": "toggleState",
                        "value": "ON"
                    }]
                }
            })
        );
    }

    #[test]
    fn test_acknowledgment_keeps_absent_fields_as_null() {
        let response = acknowledgment("garage-right", None, None, "m-2".to_string());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["event"]["header"]["correlationToken"].is_null());
        assert!(json["context"]["properties"][0]
            .as_object()
            .unwrap()
            .contains_key("instance"));
        assert!(json["context"]["properties"][0]["instance"].is_null());
    }
}
