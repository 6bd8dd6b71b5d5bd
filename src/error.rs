use std::error::Error as StdError;

/// Reasons an inbound payload could not be mapped to a message kind.
///
/// These never leave [`crate::platform::whatsapp::Normalizer::normalize`]:
/// they are logged and turned into "no message produced".
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("payload is null")]
    NullPayload,

    #[error("payload has no messages container")]
    MissingMessages,

    #[error("messages container is empty")]
    EmptyMessages,

    #[error("message has no type discriminator")]
    MissingType,

    #[error("unsupported message type: {0}")]
    UnsupportedType(String),

    #[error("malformed {kind} message: {source}")]
    Malformed {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Channel configuration could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no header validation supplied for a media message")]
    MissingHeader,

    #[error("no connector configuration for service identifier {0}")]
    ChannelNotFound(String),

    #[error("channel {service_identifier} is missing attribute {key}")]
    MissingAttribute {
        service_identifier: String,
        key: String,
    },

    #[error("channel repository lookup failed for {service_identifier}: {source}")]
    Repository {
        service_identifier: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// Failures talking to, or reading the answer of, the file engine.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Io {
        url: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("failed to encode media descriptor: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("malformed upload response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("upload response size {value:?} is not an integer")]
    InvalidSize {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Errors surfaced by normalization. Classification failures are not among
/// them; those produce `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("file engine rejected upload with status {status_code}: {body}")]
    UploadRejected { status_code: u16, body: String },
}

impl TransportError {
    #[must_use]
    pub fn io(url: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Io {
            url: url.into(),
            source: Box::new(source),
        }
    }
}

impl ConfigurationError {
    #[must_use]
    pub fn repository(
        service_identifier: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Repository {
            service_identifier: service_identifier.into(),
            source: Box::new(source),
        }
    }
}
