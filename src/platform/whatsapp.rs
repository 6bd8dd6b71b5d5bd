use tracing::{debug, error, info, warn};

use crate::error::{ClassificationError, ConfigurationError, NormalizeError};
use crate::media::MediaUploader;
use crate::message::{Attachment, Body, CanonicalMessage, Sender};
use crate::platform::payload::{self, Content, Interactive, MediaFragment};
use crate::platform::{HeaderValidation, RawPayload};

/// Turns WhatsApp webhook payloads into canonical messages
pub struct Normalizer {
    uploader: MediaUploader,
}

impl Normalizer {
    pub fn new(uploader: MediaUploader) -> Self {
        Self { uploader }
    }

    /// Normalize the first message of a webhook payload.
    ///
    /// Returns `Ok(None)` when the payload cannot be classified (null, no
    /// messages, unsupported type, malformed fields); the reason is logged.
    /// Channel configuration and transport failures are returned as errors,
    /// as is a non-success answer from the file engine.
    pub async fn normalize(
        &self,
        payload: Option<&RawPayload>,
        header: Option<&HeaderValidation>,
    ) -> Result<Option<CanonicalMessage>, NormalizeError> {
        let inbound = match payload::classify(payload) {
            Ok(inbound) => inbound,
            Err(e @ ClassificationError::UnsupportedType(_)) => {
                warn!("Dropping inbound message: {}", e);
                return Ok(None);
            }
            Err(e) => {
                error!("Unable to construct message: {}", e);
                return Ok(None);
            }
        };

        debug!(
            "Normalizing {} message {} from {}",
            inbound.content.kind(),
            inbound.id,
            inbound.from
        );

        let body = self.build_body(inbound.content, header).await?;

        info!("Inbound message {} normalized as {}", inbound.id, body);

        Ok(Some(CanonicalMessage {
            id: inbound.id,
            sender: Sender {
                id: inbound.from,
                name: inbound.sender_name,
            },
            timestamp: inbound.timestamp,
            reply_to: inbound.reply_to,
            body,
        }))
    }

    async fn build_body(
        &self,
        content: Content,
        header: Option<&HeaderValidation>,
    ) -> Result<Body, NormalizeError> {
        let body = match content {
            Content::Text { text } => Body::Plain {
                text: text.body,
                postback: None,
            },
            Content::Location { location } => Body::Location {
                address: location.address,
                latitude: location.latitude,
                longitude: location.longitude,
                name: location.name,
                url: location.url,
            },
            Content::Contacts { contacts } => Body::Contact {
                contacts: contacts.into_iter().map(Into::into).collect(),
            },
            Content::Image { image } => Body::Image {
                attachment: self.upload(&image, header).await?,
                caption: image.caption,
            },
            Content::Video { video } => Body::Video {
                attachment: self.upload(&video, header).await?,
                caption: video.caption,
            },
            Content::Audio { audio: fragment } | Content::Voice { voice: fragment } => {
                Body::Audio {
                    attachment: self.upload(&fragment, header).await?,
                }
            }
            Content::Sticker { sticker } => {
                let metadata = self.upload(&sticker, header).await?;
                Body::Sticker {
                    media_url: self.uploader.file_engine().thumbnail_url(&metadata.name),
                    metadata,
                    pack: sticker.metadata,
                }
            }
            Content::Document { document } => Body::File {
                attachment: self.upload(&document, header).await?,
                caption: document.caption,
            },
            Content::Interactive {
                interactive: Interactive::ListReply { list_reply: row },
            }
            | Content::Interactive {
                interactive: Interactive::ButtonReply { button_reply: row },
            } => Body::Plain {
                text: row.title,
                postback: row.id,
            },
            Content::Button { button } => Body::Plain {
                text: button.text,
                postback: button.payload,
            },
        };
        Ok(body)
    }

    /// Upload a media fragment and read the stored file's metadata.
    /// Anything but a 2xx answer fails the message.
    async fn upload(
        &self,
        fragment: &MediaFragment,
        header: Option<&HeaderValidation>,
    ) -> Result<Attachment, NormalizeError> {
        let header = header.ok_or(ConfigurationError::MissingHeader)?;
        let status = self.uploader.upload(fragment, header).await?;

        if !status.is_success() {
            error!(
                "File engine rejected upload for service {} with status {}",
                header.service_identifier, status.status_code
            );
            return Err(NormalizeError::UploadRejected {
                status_code: status.status_code,
                body: status.body,
            });
        }

        Ok(status.attachment(self.uploader.file_engine())?)
    }
}
