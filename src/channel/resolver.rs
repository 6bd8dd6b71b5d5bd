use std::sync::Arc;

use tracing::{debug, error};

use super::{ChannelAttributes, ChannelRepository};
use crate::error::ConfigurationError;

/// Looks up a channel's connector attributes by service identifier.
///
/// Every call goes to the repository; nothing is cached.
#[derive(Clone)]
pub struct ChannelConfigResolver {
    repository: Arc<dyn ChannelRepository>,
}

impl ChannelConfigResolver {
    pub fn new(repository: Arc<dyn ChannelRepository>) -> Self {
        Self { repository }
    }

    pub async fn resolve(
        &self,
        service_identifier: &str,
    ) -> Result<ChannelAttributes, ConfigurationError> {
        let attributes = self
            .repository
            .connector_configurations(service_identifier)
            .await
            .inspect_err(|e| error!("Channel lookup failed: {}", e))?;

        if attributes.is_empty() {
            error!(
                "No connector configuration found for service {}",
                service_identifier
            );
            return Err(ConfigurationError::ChannelNotFound(
                service_identifier.to_string(),
            ));
        }

        debug!("Resolved channel config for service {}", service_identifier);
        Ok(ChannelAttributes::new(service_identifier, attributes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Attribute, API_KEY, HOST_URL};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRepository {
        attributes: Vec<Attribute>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChannelRepository for CountingRepository {
        async fn connector_configurations(
            &self,
            _service_identifier: &str,
        ) -> Result<Vec<Attribute>, ConfigurationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.attributes.clone())
        }
    }

    struct FailingRepository;

    #[async_trait]
    impl ChannelRepository for FailingRepository {
        async fn connector_configurations(
            &self,
            service_identifier: &str,
        ) -> Result<Vec<Attribute>, ConfigurationError> {
            Err(ConfigurationError::repository(
                service_identifier,
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "store down"),
            ))
        }
    }

    #[tokio::test]
    async fn test_resolve_queries_repository_every_time() {
        let repo = Arc::new(CountingRepository {
            attributes: vec![
                Attribute::new(HOST_URL, "expertflow.com"),
                Attribute::new(API_KEY, "expertflow"),
            ],
            calls: AtomicUsize::new(0),
        });
        let resolver = ChannelConfigResolver::new(repo.clone());

        let first = resolver.resolve("123").await.unwrap();
        let second = resolver.resolve("123").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.api_key().unwrap(), "expertflow");
        assert_eq!(repo.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unknown_channel_is_an_error() {
        let resolver = ChannelConfigResolver::new(Arc::new(CountingRepository {
            attributes: Vec::new(),
            calls: AtomicUsize::new(0),
        }));

        let err = resolver.resolve("999").await.unwrap_err();
        assert!(matches!(err, ConfigurationError::ChannelNotFound(id) if id == "999"));
    }

    #[tokio::test]
    async fn test_repository_failure_propagates() {
        let resolver = ChannelConfigResolver::new(Arc::new(FailingRepository));
        let err = resolver.resolve("123").await.unwrap_err();
        assert!(matches!(err, ConfigurationError::Repository { .. }));
        assert!(err.to_string().contains("store down"));
    }
}
