use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::channel::Attribute;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub file_engine: FileEngineConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

/// Where uploaded media is stored and served from.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FileEngineConfig {
    pub url: String,
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
    #[serde(default = "default_download_path")]
    pub download_path: String,
}

impl FileEngineConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            upload_path: default_upload_path(),
            download_path: default_download_path(),
        }
    }

    /// Endpoint that accepts media descriptors.
    pub fn upload_url(&self) -> String {
        join_url(&self.url, &self.upload_path)
    }

    /// Download URL for a stored file.
    pub fn download_url(&self, name: &str) -> String {
        format!("{}?filename={}", join_url(&self.url, &self.download_path), name)
    }

    /// Thumbnail URL for a stored image, used for stickers.
    pub fn thumbnail_url(&self, name: &str) -> String {
        format!("{}&thumbnail=true", self.download_url(name))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Connector configuration for one channel, keyed by service identifier.
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelConfig {
    pub service_identifier: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

fn default_upload_path() -> String {
    "/api/uploadFileStream".to_string()
}

fn default_download_path() -> String {
    "/api/downloadFileStream".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;

        if config.file_engine.url.trim().is_empty() {
            anyhow::bail!("file_engine.url must not be empty");
        }

        Ok(config)
    }
}
