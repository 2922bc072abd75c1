use std::collections::HashMap;
use std::sync::Arc;

use super::CompletionProvider;
use crate::config::RelayConfig;
use crate::domain::ProviderId;
use crate::infrastructure::openai::OpenAiClient;

/// Static dispatch table from provider id to its implementation.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Arc<dyn CompletionProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new().with_provider(Arc::new(OpenAiClient::from_config(config)))
    }

    pub fn with_provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.providers.insert(provider.id(), provider);
        self
    }

    pub fn resolve(&self, id: ProviderId) -> Option<Arc<dyn CompletionProvider>> {
        self.providers.get(&id).cloned()
    }

    pub fn contains(&self, id: ProviderId) -> bool {
        self.providers.contains_key(&id)
    }
}
