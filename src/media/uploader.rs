use std::sync::Arc;

use tracing::{debug, error, info};

use super::{Media, Transport, UploadStatus};
use crate::channel::{ChannelAttributes, ChannelConfigResolver};
use crate::config::FileEngineConfig;
use crate::error::{NormalizeError, TransportError};
use crate::platform::payload::MediaFragment;
use crate::platform::HeaderValidation;

/// Forwards inbound media to the file engine, one attempt per call.
pub struct MediaUploader {
    resolver: ChannelConfigResolver,
    transport: Arc<dyn Transport>,
    file_engine: FileEngineConfig,
}

impl MediaUploader {
    pub fn new(
        resolver: ChannelConfigResolver,
        transport: Arc<dyn Transport>,
        file_engine: FileEngineConfig,
    ) -> Self {
        info!("File engine upload endpoint: {}", file_engine.upload_url());
        Self {
            resolver,
            transport,
            file_engine,
        }
    }

    pub fn file_engine(&self) -> &FileEngineConfig {
        &self.file_engine
    }

    /// Resolve the channel, describe the media and upload it.
    ///
    /// The status is returned as received; deciding what a non-success status
    /// means is up to the caller.
    pub async fn upload(
        &self,
        fragment: &MediaFragment,
        header: &HeaderValidation,
    ) -> Result<UploadStatus, NormalizeError> {
        let channel = self.resolver.resolve(&header.service_identifier).await?;
        let media = build_media(fragment, &channel)?;

        info!(
            "Uploading {} media {} for service {}",
            media.mime_type, media.file_name, header.service_identifier
        );

        Ok(self.upload_media(&media, &header.service_identifier).await?)
    }

    /// POST one media descriptor to the file engine
    pub async fn upload_media(
        &self,
        media: &Media,
        service_identifier: &str,
    ) -> Result<UploadStatus, TransportError> {
        let url = self.file_engine.upload_url();
        let body = serde_json::to_string(media).map_err(TransportError::Encode)?;

        let status = self
            .transport
            .send_post(&url, &body)
            .await
            .inspect_err(|e| error!("Upload to {} failed: {:#}", url, e))?;

        debug!(
            "File engine answered {} for service {}: {}",
            status.status_code, service_identifier, status.body
        );
        Ok(status)
    }
}

/// Media descriptor for a payload fragment. The MIME type always comes from
/// the payload, whatever the file engine later reports.
pub fn build_media(
    fragment: &MediaFragment,
    channel: &ChannelAttributes,
) -> Result<Media, NormalizeError> {
    let host_url = channel.host_url()?.trim_end_matches('/');
    let api_key = channel.api_key()?;

    let locator = match fragment.id.as_deref() {
        Some(id) => format!("{}/v1/media/{}", host_url, id),
        None => host_url.to_string(),
    };

    let file_name = fragment
        .filename
        .clone()
        .or_else(|| fragment.id.clone())
        .unwrap_or_else(|| "media".to_string());

    Ok(Media {
        media: locator,
        mime_type: fragment.mime_type.clone(),
        api_key: api_key.to_string(),
        size: fragment.file_size.unwrap_or(0),
        file_name,
    })
}
