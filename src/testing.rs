//! Collaborator fakes shared by the unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::channel::{
    Attribute, ChannelConfigResolver, StaticChannelRepository, API_KEY, HOST_URL,
};
use crate::config::ChannelConfig;
use crate::error::TransportError;
use crate::media::{Transport, UploadStatus};

pub const UPLOAD_BODY: &str = r#"{
   "message":"File uploaded successfully",
   "etag":"061439c97cade24334b1a6151d003be1",
   "name":"ME645425c97a07ff7698024f35d1690a8a",
   "type":"image/jpeg",
   "size":"60184"
}"#;

/// Transport that records every request and answers with a fixed status
pub struct FakeTransport {
    answer: Option<UploadStatus>,
    requests: Mutex<Vec<(String, String)>>,
}

impl FakeTransport {
    pub fn answering(status_code: u16, body: &str) -> Self {
        Self {
            answer: Some(UploadStatus::new(status_code, body)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request at the I/O level
    pub fn failing() -> Self {
        Self {
            answer: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send_post(&self, url: &str, json_body: &str) -> Result<UploadStatus, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), json_body.to_string()));

        match &self.answer {
            Some(status) => Ok(status.clone()),
            None => Err(TransportError::io(
                url,
                std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                ),
            )),
        }
    }
}

/// Resolver knowing a single channel, service identifier "123"
pub fn channel_resolver() -> ChannelConfigResolver {
    let repository = StaticChannelRepository::new(&[ChannelConfig {
        service_identifier: "123".to_string(),
        attributes: vec![
            Attribute::new(HOST_URL, "expertflow.com"),
            Attribute::new(API_KEY, "expertflow"),
        ],
    }]);
    ChannelConfigResolver::new(Arc::new(repository))
}
