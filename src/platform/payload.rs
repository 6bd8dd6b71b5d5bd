//! Webhook payload shapes and the parse step that classifies them.
//!
//! The raw tree is checked once here and turned into [`InboundMessage`];
//! nothing past this module reads untyped JSON.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ClassificationError;
use crate::message::{
    Contact, ContactAddress, ContactEmail, ContactName, ContactOrg, ContactPhone, ContactUrl,
};

use super::RawPayload;

const MESSAGE_TYPES: &[&str] = &[
    "text",
    "location",
    "contacts",
    "image",
    "video",
    "audio",
    "voice",
    "sticker",
    "document",
    "interactive",
    "button",
];

const INTERACTIVE_TYPES: &[&str] = &["list_reply", "button_reply"];

/// First message of a webhook, classified by kind
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub id: String,
    pub from: String,
    /// Profile name of the sender from the top-level contacts list
    pub sender_name: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub reply_to: Option<String>,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text { text: TextContent },
    Location { location: LocationContent },
    Contacts { contacts: Vec<WireContact> },
    Image { image: MediaFragment },
    Video { video: MediaFragment },
    Audio { audio: MediaFragment },
    Voice { voice: MediaFragment },
    Sticker { sticker: MediaFragment },
    Document { document: MediaFragment },
    Interactive { interactive: Interactive },
    Button { button: QuickReply },
}

impl Content {
    pub fn kind(&self) -> &'static str {
        match self {
            Content::Text { .. } => "text",
            Content::Location { .. } => "location",
            Content::Contacts { .. } => "contacts",
            Content::Image { .. } => "image",
            Content::Video { .. } => "video",
            Content::Audio { .. } => "audio",
            Content::Voice { .. } => "voice",
            Content::Sticker { .. } => "sticker",
            Content::Document { .. } => "document",
            Content::Interactive { .. } => "interactive",
            Content::Button { .. } => "button",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextContent {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationContent {
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Binary-content part of an image, video, audio, voice, sticker or document message
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaFragment {
    pub id: Option<String>,
    pub mime_type: String,
    pub caption: Option<String>,
    pub filename: Option<String>,
    pub file_size: Option<u64>,
    /// Sticker pack information; only stickers carry it
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interactive {
    ListReply { list_reply: ReplyRow },
    ButtonReply { button_reply: ReplyRow },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplyRow {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuickReply {
    pub text: String,
    pub payload: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireContact {
    #[serde(default)]
    pub name: WireName,
    #[serde(default)]
    pub phones: Vec<WirePhone>,
    #[serde(default)]
    pub emails: Vec<WireEmail>,
    #[serde(default)]
    pub addresses: Vec<WireAddress>,
    pub org: Option<WireOrg>,
    pub birthday: Option<String>,
    #[serde(default)]
    pub urls: Vec<WireUrl>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct WireName {
    #[serde(default)]
    pub formatted_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WirePhone {
    pub phone: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub wa_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireEmail {
    pub email: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireOrg {
    pub company: Option<String>,
    pub department: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireUrl {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageHeader {
    from: String,
    id: String,
    timestamp: RawTimestamp,
    context: Option<ReplyContext>,
}

/// Epoch seconds, sent either as a string or as a number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Num(i64),
    Str(String),
}

#[derive(Debug, Deserialize)]
struct ReplyContext {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileContact {
    profile: Option<Profile>,
    wa_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Profile {
    name: Option<String>,
}

/// Classify the first message of a webhook payload.
pub fn classify(payload: Option<&RawPayload>) -> Result<InboundMessage, ClassificationError> {
    let payload = payload.ok_or(ClassificationError::NullPayload)?;

    let messages = payload
        .get("messages")
        .and_then(Value::as_array)
        .ok_or(ClassificationError::MissingMessages)?;
    let first = messages.first().ok_or(ClassificationError::EmptyMessages)?;

    let kind = discriminator(first)?;

    let malformed = |source: serde_json::Error| ClassificationError::Malformed {
        kind: kind.clone(),
        source,
    };
    let content = Content::deserialize(first).map_err(malformed)?;
    let header = MessageHeader::deserialize(first).map_err(malformed)?;

    let timestamp = parse_timestamp(&header.timestamp)?;
    let sender_name = sender_name(payload, &header.from);

    Ok(InboundMessage {
        id: header.id,
        from: header.from,
        sender_name,
        timestamp,
        reply_to: header.context.and_then(|c| c.id),
        content,
    })
}

/// Reads `type`, and for interactive messages the nested `interactive.type`,
/// rejecting anything not handled.
fn discriminator(message: &Value) -> Result<String, ClassificationError> {
    let kind = message
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ClassificationError::MissingType)?;

    if !MESSAGE_TYPES.contains(&kind) {
        return Err(ClassificationError::UnsupportedType(kind.to_string()));
    }

    if kind == "interactive" {
        let sub_kind = message
            .pointer("/interactive/type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if !INTERACTIVE_TYPES.contains(&sub_kind) {
            return Err(ClassificationError::UnsupportedType(format!(
                "interactive/{}",
                sub_kind
            )));
        }
        return Ok(format!("interactive/{}", sub_kind));
    }

    Ok(kind.to_string())
}

fn parse_timestamp(raw: &RawTimestamp) -> Result<DateTime<Utc>, ClassificationError> {
    let (secs, shown) = match raw {
        RawTimestamp::Num(secs) => (Some(*secs), secs.to_string()),
        RawTimestamp::Str(s) => (s.trim().parse::<i64>().ok(), s.clone()),
    };
    secs.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .ok_or(ClassificationError::InvalidTimestamp(shown))
}

fn sender_name(payload: &RawPayload, from: &str) -> Option<String> {
    let contacts = payload.get("contacts")?;
    let contacts = Vec::<ProfileContact>::deserialize(contacts).ok()?;
    contacts
        .into_iter()
        .find(|c| c.wa_id.as_deref() == Some(from))
        .and_then(|c| c.profile)
        .and_then(|p| p.name)
}

impl From<WireContact> for Contact {
    fn from(wire: WireContact) -> Self {
        Contact {
            name: ContactName {
                formatted_name: wire.name.formatted_name,
                first_name: wire.name.first_name,
                last_name: wire.name.last_name,
                middle_name: wire.name.middle_name,
                prefix: wire.name.prefix,
                suffix: wire.name.suffix,
            },
            phones: wire
                .phones
                .into_iter()
                .map(|p| ContactPhone {
                    phone: p.phone,
                    kind: p.kind,
                    wa_id: p.wa_id,
                })
                .collect(),
            emails: wire
                .emails
                .into_iter()
                .map(|e| ContactEmail {
                    email: e.email,
                    kind: e.kind,
                })
                .collect(),
            addresses: wire
                .addresses
                .into_iter()
                .map(|a| ContactAddress {
                    street: a.street,
                    city: a.city,
                    state: a.state,
                    zip: a.zip,
                    country: a.country,
                    country_code: a.country_code,
                    kind: a.kind,
                })
                .collect(),
            org: wire.org.map(|o| ContactOrg {
                company: o.company,
                department: o.department,
                title: o.title,
            }),
            birthday: wire.birthday,
            urls: wire
                .urls
                .into_iter()
                .map(|u| ContactUrl {
                    url: u.url,
                    kind: u.kind,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(message: Value) -> Value {
        json!({
            "contacts": [{ "profile": { "name": "Kerry Fisher" }, "wa_id": "16315551234" }],
            "messages": [message]
        })
    }

    #[test]
    fn test_text_message() {
        let payload = wrap(json!({
            "from": "16315551234",
            "id": "ABGGFlA5FpafAgo6tHcNmNjXmuSf",
            "timestamp": "1518694235",
            "text": { "body": "Hello this is an answer" },
            "type": "text"
        }));

        let inbound = classify(Some(&payload)).unwrap();
        assert_eq!(inbound.id, "ABGGFlA5FpafAgo6tHcNmNjXmuSf");
        assert_eq!(inbound.sender_name.as_deref(), Some("Kerry Fisher"));
        assert_eq!(inbound.timestamp.timestamp(), 1518694235);
        assert_eq!(
            inbound.content,
            Content::Text {
                text: TextContent {
                    body: "Hello this is an answer".to_string()
                }
            }
        );
    }

    #[test]
    fn test_null_and_missing_container() {
        assert!(matches!(
            classify(None),
            Err(ClassificationError::NullPayload)
        ));
        assert!(matches!(
            classify(Some(&json!({ "statuses": [] }))),
            Err(ClassificationError::MissingMessages)
        ));
        assert!(matches!(
            classify(Some(&json!({ "messages": [] }))),
            Err(ClassificationError::EmptyMessages)
        ));
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let payload = wrap(json!({
            "from": "1", "id": "x", "timestamp": "1", "type": "reaction",
            "reaction": { "emoji": "+1" }
        }));
        match classify(Some(&payload)) {
            Err(ClassificationError::UnsupportedType(kind)) => assert_eq!(kind, "reaction"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_interactive_type_is_unsupported() {
        let payload = wrap(json!({
            "from": "1", "id": "x", "timestamp": "1", "type": "interactive",
            "interactive": { "type": "nfm_reply", "nfm_reply": {} }
        }));
        match classify(Some(&payload)) {
            Err(ClassificationError::UnsupportedType(kind)) => {
                assert_eq!(kind, "interactive/nfm_reply")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_media_without_mime_type_is_malformed() {
        let payload = wrap(json!({
            "from": "1", "id": "x", "timestamp": "1", "type": "image",
            "image": { "id": "b1c68f38", "caption": "no mime" }
        }));
        match classify(Some(&payload)) {
            Err(ClassificationError::Malformed { kind, .. }) => assert_eq!(kind, "image"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_type() {
        let payload = wrap(json!({ "from": "1", "id": "x", "timestamp": "1" }));
        assert!(matches!(
            classify(Some(&payload)),
            Err(ClassificationError::MissingType)
        ));
    }

    #[test]
    fn test_invalid_timestamp() {
        let payload = wrap(json!({
            "from": "1", "id": "x", "timestamp": "yesterday", "type": "text",
            "text": { "body": "hi" }
        }));
        assert!(matches!(
            classify(Some(&payload)),
            Err(ClassificationError::InvalidTimestamp(raw)) if raw == "yesterday"
        ));
    }

    #[test]
    fn test_numeric_timestamp() {
        let payload = json!({
            "messages": [{
                "from": "1", "id": "x", "timestamp": 1521497954, "type": "text",
                "text": { "body": "hi" }
            }]
        });

        let inbound = classify(Some(&payload)).unwrap();
        assert_eq!(inbound.timestamp.timestamp(), 1521497954);
        assert_eq!(inbound.content.kind(), "text");
    }

    #[test]
    fn test_reply_context_and_quick_reply() {
        let payload = json!({
            "messages": [{
                "button": { "payload": "No-Button-Payload", "text": "Expertflow" },
                "context": { "from": "16315558007", "id": "gBGGFmkiWVVPAgkgQkwi7IORac0" },
                "from": "16505551234",
                "id": "ABGGFmkiWVVPAgo-sKD87hgxPHdF",
                "timestamp": "1591210827",
                "type": "button"
            }]
        });

        let inbound = classify(Some(&payload)).unwrap();
        assert_eq!(inbound.reply_to.as_deref(), Some("gBGGFmkiWVVPAgkgQkwi7IORac0"));
        assert_eq!(inbound.sender_name, None);
        assert_eq!(inbound.content.kind(), "button");
    }

    #[test]
    fn test_contact_conversion() {
        let wire: WireContact = serde_json::from_value(json!({
            "addresses": [{ "city": "Menlo Park", "country_code": "us", "type": "WORK" }],
            "birthday": "2012-08-18",
            "emails": [{ "email": "kfish@fb.com", "type": "WORK" }],
            "name": { "first_name": "Kerry", "formatted_name": "Kerry Fisher", "last_name": "Fisher" },
            "org": { "company": "Facebook" },
            "phones": [{ "phone": "+1 (940) 555-1234", "type": "CELL" }],
            "urls": [{ "url": "https://www.facebook.com", "type": "WORK" }]
        }))
        .unwrap();

        let contact = Contact::from(wire);
        assert_eq!(contact.name.formatted_name, "Kerry Fisher");
        assert_eq!(contact.name.first_name.as_deref(), Some("Kerry"));
        assert_eq!(contact.phones[0].kind.as_deref(), Some("CELL"));
        assert_eq!(contact.emails[0].email, "kfish@fb.com");
        assert_eq!(contact.addresses[0].country_code.as_deref(), Some("us"));
        assert_eq!(contact.org.unwrap().company.as_deref(), Some("Facebook"));
        assert_eq!(contact.birthday.as_deref(), Some("2012-08-18"));
        assert_eq!(contact.urls[0].url, "https://www.facebook.com");
    }
}
