//! Skill configuration
//!
//! Loaded once at process start and handed to the dispatcher. Sources,
//! highest precedence first: `GARAGE_*` environment variables, an
//! optional TOML file, built-in defaults.

use crate::error::{Result, SkillError};
use crate::provider::iot::IotConfig;
use crate::provider::nats::NatsConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "GARAGE_";

/// Display category advertised at discovery
///
/// `GarageDoor` makes the voice assistant demand a spoken PIN and
/// manual enabling of voice control; `Switch` does not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayCategory {
    #[default]
    Switch,
    GarageDoor,
}

impl DisplayCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayCategory::Switch => "SWITCH",
            DisplayCategory::GarageDoor => "GARAGE_DOOR",
        }
    }
}

impl FromStr for DisplayCategory {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SWITCH" => Ok(DisplayCategory::Switch),
            "GARAGE_DOOR" => Ok(DisplayCategory::GarageDoor),
            other => Err(SkillError::Config(format!(
                "Unknown display category '{}' (expected SWITCH or GARAGE_DOOR)",
                other
            ))),
        }
    }
}

/// Message-bus backend selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum PublisherConfig {
    /// AWS IoT data plane over HTTPS
    Iot(IotConfig),
    /// Core NATS
    Nats(NatsConfig),
    /// Record messages in memory; nothing leaves the process
    Memory,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        PublisherConfig::Iot(IotConfig::default())
    }
}

impl PublisherConfig {
    pub fn backend(&self) -> &'static str {
        match self {
            PublisherConfig::Iot(_) => "iot",
            PublisherConfig::Nats(_) => "nats",
            PublisherConfig::Memory => "memory",
        }
    }

    fn with_backend(backend: &str) -> Result<Self> {
        match backend.trim().to_ascii_lowercase().as_str() {
            "iot" => Ok(PublisherConfig::Iot(IotConfig::default())),
            "nats" => Ok(PublisherConfig::Nats(NatsConfig::default())),
            "memory" => Ok(PublisherConfig::Memory),
            other => Err(SkillError::Config(format!(
                "Unknown publisher backend '{}' (expected iot, nats or memory)",
                other
            ))),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillConfig {
    #[serde(default)]
    pub display_category: DisplayCategory,

    /// Manufacturer reported for both endpoints
    #[serde(default = "default_manufacturer_name")]
    pub manufacturer_name: String,

    /// Free-text endpoint description
    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default)]
    pub publisher: PublisherConfig,
}

fn default_manufacturer_name() -> String {
    "kylekyle".to_string()
}

fn default_description() -> String {
    "Hacked Garage Door Opener".to_string()
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            display_category: DisplayCategory::default(),
            manufacturer_name: default_manufacturer_name(),
            description: default_description(),
            publisher: PublisherConfig::default(),
        }
    }
}

/// `GARAGE_*` variables, as read by envy
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    display_category: Option<String>,
    manufacturer_name: Option<String>,
    description: Option<String>,
    publisher: Option<String>,
    iot_region: Option<String>,
    iot_endpoint: Option<String>,
    nats_url: Option<String>,
}

impl SkillConfig {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SkillError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// File (if given) or defaults, then process environment, then validation
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                tracing::info!("Loading config from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `GARAGE_*` variables from the given set
    pub fn apply_env(&mut self, vars: impl IntoIterator<Item = (String, String)>) -> Result<()> {
        let overrides: EnvOverrides = envy::prefixed(ENV_PREFIX).from_iter(vars)?;

        if let Some(category) = overrides.display_category {
            self.display_category = category.parse()?;
        }
        if let Some(name) = overrides.manufacturer_name {
            self.manufacturer_name = name;
        }
        if let Some(description) = overrides.description {
            self.description = description;
        }
        if let Some(backend) = overrides.publisher {
            if backend.trim().to_ascii_lowercase() != self.publisher.backend() {
                self.publisher = PublisherConfig::with_backend(&backend)?;
            }
        }

        match &mut self.publisher {
            PublisherConfig::Iot(iot) => {
                if let Some(region) = overrides.iot_region {
                    iot.region = region;
                }
                if let Some(endpoint) = overrides.iot_endpoint {
                    iot.endpoint = endpoint;
                }
            }
            PublisherConfig::Nats(nats) => {
                if let Some(url) = overrides.nats_url {
                    nats.url = url;
                }
            }
            PublisherConfig::Memory => {}
        }

        Ok(())
    }

    /// Check skill-level settings
    ///
    /// Backend settings such as the IoT endpoint are checked when the
    /// publisher connects, so discovery works before the bus is set up.
    pub fn validate(&self) -> Result<()> {
        if self.manufacturer_name.trim().is_empty() {
            return Err(SkillError::Config(
                "manufacturer_name must not be empty".to_string(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(SkillError::Config("description must not be empty".to_string()));
        }
        Ok(())
    }
}
