use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::UploadStatus;
use crate::config::HttpConfig;
use crate::error::TransportError;

/// Sends a JSON document with POST and hands back status and body.
///
/// Any HTTP answer, including error statuses, is an `Ok`; only I/O failures
/// are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_post(&self, url: &str, json_body: &str) -> Result<UploadStatus, TransportError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_post(&self, url: &str, json_body: &str) -> Result<UploadStatus, TransportError> {
        debug!("Sending POST request to {}", url);

        let io_error = |e: reqwest::Error| TransportError::io(url, e);

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(json_body.to_string())
            .send()
            .await
            .map_err(io_error)?;

        let status = response.status();
        let body = response.text().await.map_err(io_error)?;

        debug!("POST {} answered {}", url, status);
        Ok(UploadStatus::new(status.as_u16(), body))
    }
}
