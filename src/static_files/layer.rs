use std::path::PathBuf;
use std::sync::Arc;
use tower::Layer;

use super::error::NegotiationError;
use super::negotiator::Negotiator;
use super::options::StaticFileOptions;
use super::service::NegotiationService;
use crate::config::Config;
use crate::negotiation::{ContentTypeRegistry, ProviderRegistry};
use crate::observability::NegotiationMetrics;

/// Tower layer that negotiates alternative files for the wrapped file service
#[derive(Clone)]
pub struct NegotiationLayer {
    negotiator: Arc<Negotiator>,
}

impl NegotiationLayer {
    /// Build the layer and run provider registration.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::NoProviders`] when `providers` is empty.
    pub fn new(
        web_root: impl Into<PathBuf>,
        options: StaticFileOptions,
        providers: ProviderRegistry,
    ) -> Result<Self, NegotiationError> {
        let negotiator = Negotiator::new(web_root.into(), options, providers)?;
        Ok(Self {
            negotiator: Arc::new(negotiator),
        })
    }

    /// Layer for the configured web root with the built-in providers
    pub fn from_config(config: &Config) -> Result<Self, NegotiationError> {
        let content_types = ContentTypeRegistry::with_mappings(config.content_type_mappings());
        let options = StaticFileOptions::default().with_content_types(content_types);

        Self::new(
            &config.server.web_root,
            options,
            ProviderRegistry::with_defaults(&config.negotiation),
        )
    }

    /// Content types after provider registration
    pub fn content_types(&self) -> &ContentTypeRegistry {
        self.negotiator.content_types()
    }

    pub fn metrics(&self) -> Arc<NegotiationMetrics> {
        self.negotiator.metrics().clone()
    }
}

impl<S> Layer<S> for NegotiationLayer {
    type Service = NegotiationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        NegotiationService::new(inner, self.negotiator.clone())
    }
}
