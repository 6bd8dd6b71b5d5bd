//! Normalization of inbound WhatsApp webhook notifications into canonical
//! messages, forwarding media to the file engine on the way.

pub mod channel;
pub mod config;
pub mod error;
pub mod media;
pub mod message;
pub mod platform;

#[cfg(test)]
mod testing;

pub use error::{ClassificationError, ConfigurationError, NormalizeError, TransportError};
pub use message::{Body, CanonicalMessage};
pub use platform::whatsapp::Normalizer;
pub use platform::HeaderValidation;
