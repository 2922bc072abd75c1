use crate::application::{ListModels, RelayCompletion, RelayMessage};
use crate::config::RelayConfig;
use crate::infrastructure::providers::ProviderRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub relay_completion: Arc<RelayCompletion>,
    pub relay_message: Arc<RelayMessage>,
    pub list_models: Arc<ListModels>,
    pub config: Arc<RelayConfig>,
}

impl AppContext {
    pub fn new(config: RelayConfig) -> Self {
        let registry = ProviderRegistry::from_config(&config);
        Self::with_registry(config, registry)
    }

    /// Builds the context around an explicit provider set, e.g. a test double.
    pub fn with_registry(config: RelayConfig, registry: ProviderRegistry) -> Self {
        let registry = Arc::new(registry);
        Self {
            relay_completion: Arc::new(RelayCompletion::new(registry.clone())),
            relay_message: Arc::new(RelayMessage::new(
                registry.clone(),
                config.default_model.clone(),
            )),
            list_models: Arc::new(ListModels::new(registry)),
            config: Arc::new(config),
        }
    }

    pub fn from_env() -> Result<Self, crate::config::ConfigError> {
        let config = RelayConfig::from_env()?;
        tracing::info!(
            "Relaying to {} (default model {})",
            config.openai_base_url,
            config.default_model
        );
        Ok(Self::new(config))
    }
}
