pub mod transport;
pub mod uploader;

use serde::{Deserialize, Serialize};

use crate::config::FileEngineConfig;
use crate::error::TransportError;
use crate::message::Attachment;

pub use transport::{HttpTransport, Transport};
pub use uploader::MediaUploader;

/// Descriptor of a file the file engine should fetch and store.
/// Built per upload, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// Where the file engine downloads the media from
    pub media: String,
    pub mime_type: String,
    /// Channel API key the file engine authenticates with
    pub api_key: String,
    pub size: u64,
    pub file_name: String,
}

/// Raw outcome of one upload call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadStatus {
    pub status_code: u16,
    pub body: String,
}

/// JSON body returned by the file engine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: String,
    pub etag: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: String,
}

impl UploadStatus {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn response(&self) -> Result<UploadResponse, TransportError> {
        serde_json::from_str(&self.body).map_err(TransportError::MalformedResponse)
    }

    /// Attachment metadata for the stored file. `size` is sent as a string
    /// and must hold an unsigned integer.
    pub fn attachment(&self, file_engine: &FileEngineConfig) -> Result<Attachment, TransportError> {
        let response = self.response()?;
        let size_bytes = response
            .size
            .parse::<u64>()
            .map_err(|source| TransportError::InvalidSize {
                value: response.size.clone(),
                source,
            })?;

        Ok(Attachment {
            media_url: file_engine.download_url(&response.name),
            etag: response.etag,
            name: response.name,
            mime_type: response.mime_type,
            size_bytes,
        })
    }
}
