//! AWS IoT data plane message publisher
//!
//! Publishes over the HTTPS `Publish` API of the IoT data plane:
//! `POST /topics/{topic}?qos={n}` with the payload as the request body,
//! signed with Signature Version 4.

mod config;
mod sigv4;

pub use config::{IotConfig, SIGNING_SERVICE};
pub use sigv4::{Credentials, SignableRequest, Signer};

use crate::error::{Result, SkillError};
use crate::provider::{MessagePublisher, PublishMessage};
use async_trait::async_trait;
use std::time::Duration;

/// IoT data plane publisher
pub struct IotDataPublisher {
    http: reqwest::Client,
    signer: Signer,
    config: IotConfig,
}

impl IotDataPublisher {
    pub fn new(config: IotConfig, credentials: Credentials) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SkillError::Connection(format!("Failed to build HTTP client: {}", e)))?;

        let signer = Signer::new(credentials, config.region.clone(), SIGNING_SERVICE);

        tracing::info!(
            endpoint = %config.base_url(),
            region = %config.region,
            "IoT data plane publisher configured"
        );

        Ok(Self { http, signer, config })
    }

    /// Build a publisher with credentials from the process environment
    ///
    /// The endpoint settings are checked before the credentials are read.
    pub fn from_env(config: IotConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config, Credentials::from_env()?)
    }

    pub fn config(&self) -> &IotConfig {
        &self.config
    }

    /// Signed request for a message, not yet sent
    pub fn build_request(&self, message: &PublishMessage) -> Result<reqwest::Request> {
        let url = self.config.publish_url(&message.topic, message.qos.level())?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(SkillError::Config(format!(
                    "IoT endpoint '{}' has no host",
                    self.config.endpoint
                )))
            }
        };

        let signable = SignableRequest {
            method: "POST",
            host: &host,
            path: url.path(),
            query: url.query().unwrap_or_default(),
            body: message.payload.as_bytes(),
        };
        let headers = self.signer.sign(&signable, chrono::Utc::now());

        let mut builder = self.http.post(url.clone()).body(message.payload.clone());
        for (name, value) in headers {
            builder = builder.header(name, value);
        }

        builder.build().map_err(|e| SkillError::Publish {
            topic: message.topic.clone(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl MessagePublisher for IotDataPublisher {
    async fn publish(&self, message: &PublishMessage) -> Result<()> {
        let request = self.build_request(message)?;

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| SkillError::Publish {
                topic: message.topic.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SkillError::Publish {
                topic: message.topic.clone(),
                reason: format!("HTTP {}: {}", status, body),
            });
        }

        tracing::debug!(
            topic = %message.topic,
            qos = message.qos.level(),
            status = %status,
            "Message published"
        );

        Ok(())
    }

    fn name(&self) -> &str {
        "iot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::QoS;

    fn publisher() -> IotDataPublisher {
        let config = IotConfig {
            region: "us-west-2".to_string(),
            endpoint: "https://abc-ats.iot.us-west-2.amazonaws.com".to_string(),
            ..Default::default()
        };
        IotDataPublisher::new(config, Credentials::new("AKID", "secret")).unwrap()
    }

    #[test]
    fn test_rejects_empty_endpoint() {
        let result = IotDataPublisher::new(IotConfig::default(), Credentials::new("AKID", "secret"));
        assert!(matches!(result, Err(SkillError::Config(_))));
    }

    #[test]
    fn test_build_request() {
        let publisher = publisher();
        let message = PublishMessage::new("garage/toggle/right", QoS::AtMostOnce, "ON");
        let request = publisher.build_request(&message).unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://abc-ats.iot.us-west-2.amazonaws.com/topics/garage%2Ftoggle%2Fright?qos=0"
        );
        assert!(request.headers().contains_key("x-amz-date"));

        let auth = request.headers()["authorization"].to_str().unwrap();
        assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKID/"));
        assert!(auth.contains("/us-west-2/iotdata/aws4_request"));

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, b"ON");
    }

    #[test]
    fn test_publisher_name() {
        assert_eq!(publisher().name(), "iot");
    }
}
