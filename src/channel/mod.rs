pub mod resolver;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ChannelConfig;
use crate::error::ConfigurationError;

pub use resolver::ChannelConfigResolver;

pub const HOST_URL: &str = "HOST-URL";
pub const API_KEY: &str = "API-KEY";

/// One key/value pair of a channel's connector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    #[serde(rename = "type", default = "default_value_type")]
    pub value_type: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value_type: default_value_type(),
            value: value.into(),
        }
    }
}

fn default_value_type() -> String {
    "String50".to_string()
}

/// Configured attributes of a single channel, in repository order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelAttributes {
    service_identifier: String,
    attributes: Vec<Attribute>,
}

impl ChannelAttributes {
    pub fn new(service_identifier: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            service_identifier: service_identifier.into(),
            attributes,
        }
    }

    /// First value stored under `key`, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    pub fn require(&self, key: &str) -> Result<&str, ConfigurationError> {
        self.get(key)
            .ok_or_else(|| ConfigurationError::MissingAttribute {
                service_identifier: self.service_identifier.clone(),
                key: key.to_string(),
            })
    }

    pub fn host_url(&self) -> Result<&str, ConfigurationError> {
        self.require(HOST_URL)
    }

    pub fn api_key(&self) -> Result<&str, ConfigurationError> {
        self.require(API_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }
}

/// Backing store of connector configurations.
///
/// Implementations return an empty list when the service identifier is unknown;
/// lookup failures of the store itself are reported as
/// [`ConfigurationError::Repository`].
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    async fn connector_configurations(
        &self,
        service_identifier: &str,
    ) -> Result<Vec<Attribute>, ConfigurationError>;
}

/// Repository backed by the `[[channels]]` tables of the config file
#[derive(Debug, Clone, Default)]
pub struct StaticChannelRepository {
    channels: HashMap<String, Vec<Attribute>>,
}

impl StaticChannelRepository {
    pub fn new(channels: &[ChannelConfig]) -> Self {
        let channels = channels
            .iter()
            .map(|c| (c.service_identifier.clone(), c.attributes.clone()))
            .collect();
        Self { channels }
    }
}

#[async_trait]
impl ChannelRepository for StaticChannelRepository {
    async fn connector_configurations(
        &self,
        service_identifier: &str,
    ) -> Result<Vec<Attribute>, ConfigurationError> {
        let attributes = self
            .channels
            .get(service_identifier)
            .cloned()
            .unwrap_or_default();
        debug!(
            "Loaded {} connector attributes for service {}",
            attributes.len(),
            service_identifier
        );
        Ok(attributes)
    }
}
