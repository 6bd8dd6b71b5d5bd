use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Platform-independent representation of one inbound chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMessage {
    /// Message id assigned by the messaging platform
    pub id: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// Id of the message this one replies to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sender {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Message content. Exactly one kind per message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Body {
    Plain {
        text: String,
        /// Reply id or button payload for interactive answers
        #[serde(default, skip_serializing_if = "Option::is_none")]
        postback: Option<String>,
    },
    Location {
        address: Option<String>,
        latitude: f64,
        longitude: f64,
        name: Option<String>,
        url: Option<String>,
    },
    Contact {
        contacts: Vec<Contact>,
    },
    Image {
        caption: Option<String>,
        attachment: Attachment,
    },
    Video {
        caption: Option<String>,
        attachment: Attachment,
    },
    Audio {
        attachment: Attachment,
    },
    Sticker {
        media_url: String,
        metadata: Attachment,
        /// Sticker pack information as sent by the platform
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pack: Option<Value>,
    },
    File {
        caption: Option<String>,
        attachment: Attachment,
    },
}

impl Body {
    /// Tag used when the body is serialized
    pub fn type_name(&self) -> &'static str {
        match self {
            Body::Plain { .. } => "PLAIN",
            Body::Location { .. } => "LOCATION",
            Body::Contact { .. } => "CONTACT",
            Body::Image { .. } => "IMAGE",
            Body::Video { .. } => "VIDEO",
            Body::Audio { .. } => "AUDIO",
            Body::Sticker { .. } => "STICKER",
            Body::File { .. } => "FILE",
        }
    }

    /// The stored file backing this body, for media kinds
    pub fn attachment(&self) -> Option<&Attachment> {
        match self {
            Body::Image { attachment, .. }
            | Body::Video { attachment, .. }
            | Body::Audio { attachment }
            | Body::File { attachment, .. } => Some(attachment),
            Body::Sticker { metadata, .. } => Some(metadata),
            Body::Plain { .. } | Body::Location { .. } | Body::Contact { .. } => None,
        }
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Reference to a file held by the file engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub etag: String,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub media_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: ContactName,
    #[serde(default)]
    pub phones: Vec<ContactPhone>,
    #[serde(default)]
    pub emails: Vec<ContactEmail>,
    #[serde(default)]
    pub addresses: Vec<ContactAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<ContactOrg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default)]
    pub urls: Vec<ContactUrl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactName {
    pub formatted_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPhone {
    pub phone: String,
    pub kind: Option<String>,
    pub wa_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactEmail {
    pub email: String,
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactOrg {
    pub company: Option<String>,
    pub department: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUrl {
    pub url: String,
    pub kind: Option<String>,
}
