//! Discovery response builder
//!
//! Describes the fixed two-door topology in the smart-home discovery
//! schema. Pure: no I/O, the message id is supplied by the caller.

use crate::config::SkillConfig;
use crate::types::{Empty, Header, Side, PAYLOAD_VERSION, TOGGLE_INTERFACE, TOGGLE_PROPERTY};
use serde::{Deserialize, Serialize};

const INTERFACE_TYPE: &str = "AlexaInterface";
const BASE_INTERFACE: &str = "Alexa";
const FRIENDLY_NAME_LOCALE: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryResponse {
    pub event: DiscoveryEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryEvent {
    pub header: Header,
    pub payload: DiscoveryPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryPayload {
    pub endpoints: Vec<EndpointDescriptor>,
}

/// One discoverable endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    pub endpoint_id: String,
    pub manufacturer_name: String,
    pub description: String,
    pub friendly_name: String,
    pub display_categories: Vec<String>,
    pub cookie: Empty,
    pub connections: Vec<serde_json::Value>,
    pub relationships: Empty,
    pub additional_attributes: Empty,
    pub capabilities: Vec<Capability>,
}

/// A capability interface advertised by an endpoint
///
/// The base `Alexa` interface carries only type, interface and version;
/// the optional blocks are omitted from its JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    #[serde(rename = "type")]
    pub kind: String,
    pub interface: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<CapabilityProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability_resources: Option<CapabilityResources>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantics: Option<Semantics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityProperties {
    pub supported: Vec<SupportedProperty>,
    pub proactively_reported: bool,
    pub retrievable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportedProperty {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityResources {
    pub friendly_names: Vec<FriendlyName>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendlyName {
    #[serde(rename = "@type")]
    pub kind: String,
    pub value: FriendlyNameValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendlyNameValue {
    pub text: String,
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semantics {
    pub action_mappings: Vec<ActionMapping>,
    pub state_mappings: Vec<StateMapping>,
}

/// Maps spoken actions ("open the garage") onto a directive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionMapping {
    #[serde(rename = "@type")]
    pub kind: String,
    pub actions: Vec<String>,
    pub directive: MappedDirective,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedDirective {
    pub name: String,
    pub payload: Empty,
}

/// Maps a semantic state onto a reported property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateMapping {
    #[serde(rename = "@type")]
    pub kind: String,
    pub states: Vec<String>,
    pub value: String,
}

impl ActionMapping {
    fn new(action: &str, directive: &str) -> Self {
        Self {
            kind: "ActionsToDirective".to_string(),
            actions: vec![action.to_string()],
            directive: MappedDirective {
                name: directive.to_string(),
                payload: Empty {},
            },
        }
    }
}

impl StateMapping {
    fn new(state: &str, value: &str) -> Self {
        Self {
            kind: "StatesToValue".to_string(),
            states: vec![state.to_string()],
            value: value.to_string(),
        }
    }
}

/// Toggle capability for one door
///
/// Close maps to TurnOff and Open to TurnOn; the state is never
/// reported or retrievable, only commanded.
pub fn toggle_capability(side: Side) -> Capability {
    Capability {
        kind: INTERFACE_TYPE.to_string(),
        interface: TOGGLE_INTERFACE.to_string(),
        instance: Some(side.as_str().to_string()),
        version: PAYLOAD_VERSION.to_string(),
        properties: Some(CapabilityProperties {
            supported: vec![SupportedProperty {
                name: TOGGLE_PROPERTY.to_string(),
            }],
            proactively_reported: false,
            retrievable: false,
        }),
        capability_resources: Some(CapabilityResources {
            friendly_names: vec![FriendlyName {
                kind: "text".to_string(),
                value: FriendlyNameValue {
                    text: format!("{} garage door", side.as_str()),
                    locale: FRIENDLY_NAME_LOCALE.to_string(),
                },
            }],
        }),
        semantics: Some(Semantics {
            action_mappings: vec![
                ActionMapping::new("Alexa.Actions.Close", "TurnOff"),
                ActionMapping::new("Alexa.Actions.Open", "TurnOn"),
            ],
            state_mappings: vec![
                StateMapping::new("Alexa.States.Closed", "OFF"),
                StateMapping::new("Alexa.States.Open", "ON"),
            ],
        }),
    }
}

/// The base interface every endpoint must advertise
pub fn base_capability() -> Capability {
    Capability {
        kind: INTERFACE_TYPE.to_string(),
        interface: BASE_INTERFACE.to_string(),
        instance: None,
        version: PAYLOAD_VERSION.to_string(),
        properties: None,
        capability_resources: None,
        semantics: None,
    }
}

pub fn endpoint_descriptor(side: Side, config: &SkillConfig) -> EndpointDescriptor {
    EndpointDescriptor {
        endpoint_id: side.endpoint_id(),
        manufacturer_name: config.manufacturer_name.clone(),
        description: config.description.clone(),
        friendly_name: side.friendly_name(),
        display_categories: vec![config.display_category.as_str().to_string()],
        cookie: Empty {},
        connections: Vec::new(),
        relationships: Empty {},
        additional_attributes: Empty {},
        capabilities: vec![toggle_capability(side), base_capability()],
    }
}

/// Build the full discovery response for both doors
pub fn discovery_response(config: &SkillConfig, message_id: String) -> DiscoveryResponse {
    DiscoveryResponse {
        event: DiscoveryEvent {
            header: Header {
                namespace: "Alexa.Discovery".to_string(),
                name: "Discover.Response".to_string(),
                message_id,
                payload_version: PAYLOAD_VERSION.to_string(),
            },
            payload: DiscoveryPayload {
                endpoints: Side::ALL
                    .iter()
                    .map(|side| endpoint_descriptor(*side, config))
                    .collect(),
            },
        },
    }
}
