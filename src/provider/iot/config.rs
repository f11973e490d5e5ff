//! AWS IoT data plane configuration

use crate::error::{Result, SkillError};
use serde::{Deserialize, Serialize};

/// Signing service name of the IoT data plane
pub const SIGNING_SERVICE: &str = "iotdata";

/// Where the IoT data plane lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IotConfig {
    /// AWS region used in the signing scope (e.g., "us-east-1")
    pub region: String,

    /// Account data endpoint, e.g.
    /// `https://abc123-ats.iot.us-east-1.amazonaws.com`.
    /// A bare host name is accepted and treated as https.
    pub endpoint: String,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for IotConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: String::new(),
            request_timeout_secs: 10,
        }
    }
}

impl IotConfig {
    /// Endpoint as an https base URL without a trailing slash
    pub fn base_url(&self) -> String {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            format!("https://{}", endpoint)
        }
    }

    /// URL of the publish call for a topic
    ///
    /// The topic travels as a single path segment, so its slashes are
    /// percent-encoded.
    pub fn publish_url(&self, topic: &str, qos: u8) -> Result<reqwest::Url> {
        let raw = format!(
            "{}/topics/{}?qos={}",
            self.base_url(),
            urlencoding::encode(topic),
            qos
        );
        reqwest::Url::parse(&raw)
            .map_err(|e| SkillError::Config(format!("Invalid IoT endpoint '{}': {}", self.endpoint, e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(SkillError::Config("IoT region must not be empty".to_string()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(SkillError::Config("IoT endpoint must not be empty".to_string()));
        }
        self.publish_url("garage/toggle/left", 0).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> IotConfig {
        IotConfig {
            endpoint: endpoint.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_base_url_normalization() {
        assert_eq!(
            config("abc-ats.iot.us-east-1.amazonaws.com").base_url(),
            "https://abc-ats.iot.us-east-1.amazonaws.com"
        );
        assert_eq!(
            config("https://abc-ats.iot.us-east-1.amazonaws.com/").base_url(),
            "https://abc-ats.iot.us-east-1.amazonaws.com"
        );
    }

    #[test]
    fn test_publish_url_encodes_topic() {
        let url = config("https://abc-ats.iot.us-east-1.amazonaws.com")
            .publish_url("garage/toggle/left", 0)
            .unwrap();
        assert_eq!(url.path(), "/topics/garage%2Ftoggle%2Fleft");
        assert_eq!(url.query(), Some("qos=0"));
        assert_eq!(url.host_str(), Some("abc-ats.iot.us-east-1.amazonaws.com"));
    }

    #[test]
    fn test_validate() {
        assert!(IotConfig::default().validate().is_err());
        assert!(config("abc-ats.iot.us-east-1.amazonaws.com").validate().is_ok());

        let no_region = IotConfig {
            region: " ".to_string(),
            ..config("abc-ats.iot.us-east-1.amazonaws.com")
        };
        assert!(matches!(no_region.validate(), Err(SkillError::Config(_))));
    }
}
