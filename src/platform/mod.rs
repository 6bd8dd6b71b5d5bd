pub mod payload;
pub mod whatsapp;

use serde_json::Value;

/// Webhook body as received, before classification
pub type RawPayload = Value;

/// Per-request validation result identifying which channel a webhook belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderValidation {
    /// Service identifier used to look up the channel's connector configuration
    pub service_identifier: String,
}

impl HeaderValidation {
    pub fn new(service_identifier: impl Into<String>) -> Self {
        Self {
            service_identifier: service_identifier.into(),
        }
    }
}
