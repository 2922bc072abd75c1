use std::sync::Arc;

use relay_errors::RelayError;
use serde_json::Value;

use crate::domain::ProviderId;
use crate::infrastructure::providers::ProviderRegistry;

/// Passes the upstream model listing through verbatim.
pub struct ListModels {
    registry: Arc<ProviderRegistry>,
}

impl ListModels {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self, provider: Option<&str>) -> Result<Value, RelayError> {
        let id = match provider {
            Some(name) => name.parse::<ProviderId>()?,
            None => ProviderId::default(),
        };
        let provider = self
            .registry
            .resolve(id)
            .ok_or_else(|| RelayError::UnknownProvider(id.to_string()))?;

        tracing::info!("Listing models from {}", id);
        provider.list_models().await
    }
}
