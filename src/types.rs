//! Directive and response envelopes for the smart-home protocol
//!
//! All types use camelCase JSON serialization for wire compatibility.
//! Inbound fields are optional so that any JSON object deserializes;
//! the handlers decide which absences are fatal.

use crate::error::{Result, SkillError};
use serde::{Deserialize, Serialize};

/// Protocol payload version sent on every response
pub const PAYLOAD_VERSION: &str = "3";

/// Endpoint id reported on error responses
pub const ERROR_ENDPOINT_ID: &str = "garage";

/// Interface name of the toggle capability
pub const TOGGLE_INTERFACE: &str = "Alexa.ToggleController";

/// Property reported by the toggle capability
pub const TOGGLE_PROPERTY: &str = "toggleState";

/// Topic prefix the door controller subscribes under
pub const TOGGLE_TOPIC_PREFIX: &str = "garage/toggle/";

/// Payload published for every toggle
pub const TOGGLE_PAYLOAD: &str = "ON";

// ─── Inbound ──────────────────────────────────────────────────────

/// Top-level request document delivered by the voice-assistant cloud
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directive: Option<Directive>,
}

/// A single directive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<DirectiveHeader>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<DirectiveEndpoint>,

    /// Directive payload — unused by any handler
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

/// Directive header
///
/// Fields are kept as raw JSON so that a value of an unexpected type
/// never rejects the whole document. Readers go through the
/// `DirectiveEnvelope` accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<serde_json::Value>,

    /// Capability instance targeted by the directive (e.g., "left")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<serde_json::Value>,

    /// Opaque token the response must echo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_token: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_version: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveEndpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_id: Option<serde_json::Value>,
}

/// Optional string field: absent and `null` are `None`, other types fail
fn optional_str<'a>(value: Option<&'a serde_json::Value>, field: &str) -> Result<Option<&'a str>> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(SkillError::malformed(field)),
    }
}

impl DirectiveEnvelope {
    /// Parse a raw JSON document
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    fn header(&self) -> Option<&DirectiveHeader> {
        self.directive.as_ref()?.header.as_ref()
    }

    /// The directive kind; `Unknown` when the name is absent or not a string
    pub fn name(&self) -> DirectiveName {
        match self.header().and_then(|h| h.name.as_ref()) {
            None => DirectiveName::Unknown(None),
            Some(serde_json::Value::String(name)) => DirectiveName::parse(Some(name.as_str())),
            Some(other) => DirectiveName::Unknown(Some(other.to_string())),
        }
    }

    /// Instance to echo; fails when present but not a string
    pub fn instance(&self) -> Result<Option<&str>> {
        optional_str(
            self.header().and_then(|h| h.instance.as_ref()),
            "directive.header.instance",
        )
    }

    /// Correlation token to echo; fails when present but not a string
    pub fn correlation_token(&self) -> Result<Option<&str>> {
        optional_str(
            self.header().and_then(|h| h.correlation_token.as_ref()),
            "directive.header.correlationToken",
        )
    }

    /// The addressed endpoint id; required on the toggle path
    pub fn endpoint_id(&self) -> Result<&str> {
        let value = self
            .directive
            .as_ref()
            .and_then(|d| d.endpoint.as_ref())
            .and_then(|e| e.endpoint_id.as_ref());
        optional_str(value, "directive.endpoint.endpointId")?
            .ok_or_else(|| SkillError::malformed("directive.endpoint.endpointId"))
    }
}

/// Closed set of directive names the dispatcher routes on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveName {
    Discover,
    TurnOn,
    TurnOff,
    /// Anything else, carrying the raw name if one was given
    Unknown(Option<String>),
}

impl DirectiveName {
    /// Exact, case-sensitive match on the header name
    pub fn parse(name: Option<&str>) -> Self {
        match name {
            Some("Discover") => Self::Discover,
            Some("TurnOn") => Self::TurnOn,
            Some("TurnOff") => Self::TurnOff,
            other => Self::Unknown(other.map(str::to_string)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Discover => "Discover",
            Self::TurnOn => "TurnOn",
            Self::TurnOff => "TurnOff",
            Self::Unknown(Some(name)) => name,
            Self::Unknown(None) => "",
        }
    }
}

// ─── Endpoints ────────────────────────────────────────────────────

/// One of the two garage doors exposed to the voice assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Every side, in discovery order
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// `garage-<side>`
    pub fn endpoint_id(&self) -> String {
        format!("garage-{}", self.as_str())
    }

    /// `Left Garage Door` / `Right Garage Door`
    pub fn friendly_name(&self) -> String {
        let label = match self {
            Side::Left => "Left",
            Side::Right => "Right",
        };
        format!("{} Garage Door", label)
    }

    /// Find the side named in an endpoint id
    ///
    /// Returns the side whose name occurs earliest in `endpoint_id`,
    /// or `None` when neither occurs.
    pub fn resolve(endpoint_id: &str) -> Option<Side> {
        Side::ALL
            .iter()
            .filter_map(|side| endpoint_id.find(side.as_str()).map(|pos| (pos, *side)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, side)| side)
    }
}

/// Topic for a resolved side; an unresolved side yields the bare prefix
pub fn toggle_topic(side: Option<Side>) -> String {
    format!(
        "{}{}",
        TOGGLE_TOPIC_PREFIX,
        side.map(|s| s.as_str()).unwrap_or_default()
    )
}

// ─── Outbound ─────────────────────────────────────────────────────

/// Empty JSON object (`{}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Empty {}

/// Response header without a correlation token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub namespace: String,
    pub name: String,
    pub message_id: String,
    pub payload_version: String,
}

/// Response header echoing the directive's correlation token
///
/// The token is always serialized, as `null` when the directive had none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelatedHeader {
    pub namespace: String,
    pub name: String,
    pub message_id: String,
    pub correlation_token: Option<String>,
    pub payload_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEndpoint {
    pub endpoint_id: String,
}

/// Acknowledgment of a TurnOn/TurnOff directive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub event: ToggleEvent,
    pub context: ToggleContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleEvent {
    pub header: CorrelatedHeader,
    pub endpoint: ResponseEndpoint,
    pub payload: Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleContext {
    pub properties: Vec<ContextProperty>,
}

/// A reported capability property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextProperty {
    pub namespace: String,
    /// Echoed from the directive; `null` when absent
    pub instance: Option<String>,
    pub name: String,
    pub value: String,
}

/// Error envelope for directives that cannot be routed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub event: ErrorEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub header: Header,
    pub endpoint: ResponseEndpoint,
    pub payload: ErrorPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

/// Any response the dispatcher can produce
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Discovery(crate::discovery::DiscoveryResponse),
    Toggle(ToggleResponse),
    Error(ErrorResponse),
}

impl Response {
    /// Message id of whichever envelope this is
    pub fn message_id(&self) -> &str {
        match self {
            Response::Discovery(r) => &r.event.header.message_id,
            Response::Toggle(r) => &r.event.header.message_id,
            Response::Error(r) => &r.event.header.message_id,
        }
    }

    /// Header name (`Discover.Response`, `Response`, `ErrorResponse`)
    pub fn name(&self) -> &str {
        match self {
            Response::Discovery(r) => &r.event.header.name,
            Response::Toggle(r) => &r.event.header.name,
            Response::Error(r) => &r.event.header.name,
        }
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_parsing() {
        let value = serde_json::json!({
            "directive": {
                "header": {
                    "namespace": "Alexa.ToggleController",
                    "name": "TurnOn",
                    "instance": "left",
                    "messageId": "ignored",
                    "correlationToken": "tok-1",
                    "payloadVersion": "3"
                },
                "endpoint": {
                    "scope": { "type": "BearerToken", "token": "abc" },
                    "endpointId": "garage-left",
                    "cookie": {}
                },
                "payload": {}
            }
        });

        let envelope = DirectiveEnvelope::from_value(&value).unwrap();
        assert_eq!(envelope.name(), DirectiveName::TurnOn);
        assert_eq!(envelope.instance().unwrap(), Some("left"));
        assert_eq!(envelope.correlation_token().unwrap(), Some("tok-1"));
        assert_eq!(envelope.endpoint_id().unwrap(), "garage-left");
    }

    #[test]
    fn test_empty_object_parses_as_unknown() {
        let envelope = DirectiveEnvelope::from_value(&serde_json::json!({})).unwrap();
        assert_eq!(envelope.name(), DirectiveName::Unknown(None));
        assert!(envelope.instance().unwrap().is_none());
        assert!(envelope.correlation_token().unwrap().is_none());
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = DirectiveEnvelope::from_value(&serde_json::json!("Discover")).unwrap_err();
        assert!(matches!(err, SkillError::Serialization(_)));
    }

    #[test]
    fn test_missing_endpoint_id() {
        let envelope = DirectiveEnvelope::from_value(&serde_json::json!({
            "directive": { "header": { "name": "TurnOn" } }
        }))
        .unwrap();

        let err = envelope.endpoint_id().unwrap_err();
        assert!(matches!(err, SkillError::MalformedDirective { ref field }
            if field == "directive.endpoint.endpointId"));
    }

    #[test]
    fn test_odd_field_types_still_parse() {
        let envelope = DirectiveEnvelope::from_value(&serde_json::json!({
            "directive": {
                "header": {
                    "namespace": ["Alexa"],
                    "name": 42,
                    "correlationToken": 1,
                    "instance": { "side": "left" },
                    "payloadVersion": 3
                },
                "endpoint": { "endpointId": 7 }
            }
        }))
        .unwrap();

        assert_eq!(envelope.name(), DirectiveName::Unknown(Some("42".to_string())));
        assert!(matches!(envelope.correlation_token(), Err(SkillError::MalformedDirective { ref field })
            if field == "directive.header.correlationToken"));
        assert!(matches!(envelope.instance(), Err(SkillError::MalformedDirective { ref field })
            if field == "directive.header.instance"));
        assert!(matches!(envelope.endpoint_id(), Err(SkillError::MalformedDirective { ref field })
            if field == "directive.endpoint.endpointId"));
    }

    #[test]
    fn test_null_echo_fields_are_absent() {
        let envelope = DirectiveEnvelope::from_value(&serde_json::json!({
            "directive": {
                "header": { "name": "Discover", "instance": null, "correlationToken": null }
            }
        }))
        .unwrap();

        assert_eq!(envelope.name(), DirectiveName::Discover);
        assert_eq!(envelope.instance().unwrap(), None);
        assert_eq!(envelope.correlation_token().unwrap(), None);
    }

    #[test]
    fn test_directive_name_is_case_sensitive() {
        assert_eq!(DirectiveName::parse(Some("Discover")), DirectiveName::Discover);
        assert_eq!(DirectiveName::parse(Some("TurnOff")), DirectiveName::TurnOff);
        assert_eq!(
            DirectiveName::parse(Some("discover")),
            DirectiveName::Unknown(Some("discover".to_string()))
        );
        assert_eq!(DirectiveName::parse(None).as_str(), "");
        assert_eq!(DirectiveName::parse(Some("ReportState")).as_str(), "ReportState");
    }

    #[test]
    fn test_side_resolution() {
        assert_eq!(Side::resolve("garage-left"), Some(Side::Left));
        assert_eq!(Side::resolve("garage-right"), Some(Side::Right));
        assert_eq!(Side::resolve("garage-center"), None);
        assert_eq!(Side::resolve(""), None);
    }

    #[test]
    fn test_side_resolution_earliest_match_wins() {
        assert_eq!(Side::resolve("right-of-left"), Some(Side::Right));
        assert_eq!(Side::resolve("left-or-right"), Some(Side::Left));
    }

    #[test]
    fn test_side_names() {
        assert_eq!(Side::Left.endpoint_id(), "garage-left");
        assert_eq!(Side::Right.endpoint_id(), "garage-right");
        assert_eq!(Side::Left.friendly_name(), "Left Garage Door");
        assert_eq!(Side::Right.friendly_name(), "Right Garage Door");
    }

    #[test]
    fn test_toggle_topic() {
        assert_eq!(toggle_topic(Some(Side::Left)), "garage/toggle/left");
        assert_eq!(toggle_topic(Some(Side::Right)), "garage/toggle/right");
        assert_eq!(toggle_topic(None), "garage/toggle/");
    }

    #[test]
    fn test_empty_serializes_as_object() {
        assert_eq!(serde_json::to_string(&Empty {}).unwrap(), "{}");
    }

    #[test]
    fn test_correlated_header_keeps_null_token() {
        let header = CorrelatedHeader {
            namespace: "Alexa".to_string(),
            name: "Response".to_string(),
            message_id: "m-1".to_string(),
            correlation_token: None,
            payload_version: PAYLOAD_VERSION.to_string(),
        };
        let json = serde_json::to_value(&header).unwrap();
        assert!(json.as_object().unwrap().contains_key("correlationToken"));
        assert!(json["correlationToken"].is_null());
        assert_eq!(json["messageId"], "m-1");
    }

    #[test]
    fn test_error_payload_type_key() {
        let payload = ErrorPayload {
            kind: "INTERNAL_ERROR".to_string(),
            message: "unsupported directive".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "INTERNAL_ERROR");
        assert_eq!(json["message"], "unsupported directive");
    }
}
