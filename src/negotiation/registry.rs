use std::sync::Arc;

use super::compressed::CompressedAlternativeProvider;
use super::image::ImageAlternativeProvider;
use super::traits::NegotiationProvider;
use crate::config::NegotiationConfig;

/// Ordered list of providers consulted for every request.
///
/// Registration order only matters for exact cost ties: the earlier provider wins.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn NegotiationProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn NegotiationProvider>) {
        self.providers.push(provider);
    }

    pub fn with(mut self, provider: impl NegotiationProvider + 'static) -> Self {
        self.register(Arc::new(provider));
        self
    }

    /// Create a registry with the built-in providers.
    ///
    /// Both are registered even when disabled; the configuration flags gate them
    /// per request.
    pub fn with_defaults(config: &NegotiationConfig) -> Self {
        Self::new()
            .with(CompressedAlternativeProvider::new(config))
            .with(ImageAlternativeProvider::new(config))
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn NegotiationProvider>> {
        self.providers.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|provider| provider.name()).collect()
    }
}
