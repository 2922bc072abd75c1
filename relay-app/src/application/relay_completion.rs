use std::sync::Arc;

use relay_errors::RelayError;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::{CompletionRequest, RawCompletionRequest};
use crate::infrastructure::providers::ProviderRegistry;
use crate::infrastructure::validation::RequestValidator;

/// Relays a multi-turn conversation and returns the upstream body untouched.
pub struct RelayCompletion {
    registry: Arc<ProviderRegistry>,
}

impl RelayCompletion {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self, raw: RawCompletionRequest) -> Result<Value, RelayError> {
        let span = tracing::info_span!("completion", request_id = %Uuid::new_v4());
        self.relay(raw).instrument(span).await
    }

    async fn relay(&self, raw: RawCompletionRequest) -> Result<Value, RelayError> {
        let request = RequestValidator::validate_completion(raw, &self.registry)
            .inspect_err(|e| tracing::warn!("Rejected completion request: {}", e))?;
        log_request(&request);

        let provider = self
            .registry
            .resolve(request.provider)
            .ok_or_else(|| RelayError::UnknownProvider(request.provider.to_string()))?;

        let body = provider.complete(&request).await?;
        tracing::info!("Completion relayed from {}", request.provider);
        Ok(body)
    }
}

pub(crate) fn log_request(request: &CompletionRequest) {
    tracing::info!(
        provider = %request.provider,
        model = %request.model,
        temperature = request.temperature,
        platform = request.platform.as_deref().unwrap_or("unknown"),
        messages = request.messages.len(),
        "Request received"
    );
    for message in &request.messages {
        tracing::info!(role = %message.role(), content = message.content(), "Message");
    }
}
