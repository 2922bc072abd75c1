use std::sync::Arc;

use relay_errors::RelayError;
use tracing::Instrument;
use uuid::Uuid;

use super::relay_completion::log_request;
use crate::domain::RawMessageRequest;
use crate::infrastructure::providers::ProviderRegistry;
use crate::infrastructure::validation::RequestValidator;

/// Relays a single user message and returns only the reply text.
pub struct RelayMessage {
    registry: Arc<ProviderRegistry>,
    default_model: String,
}

impl RelayMessage {
    pub fn new(registry: Arc<ProviderRegistry>, default_model: String) -> Self {
        Self {
            registry,
            default_model,
        }
    }

    pub async fn execute(&self, raw: RawMessageRequest) -> Result<String, RelayError> {
        let span = tracing::info_span!("message", request_id = %Uuid::new_v4());
        self.relay(raw).instrument(span).await
    }

    async fn relay(&self, raw: RawMessageRequest) -> Result<String, RelayError> {
        let request = RequestValidator::validate_message_request(raw, &self.default_model)
            .inspect_err(|e| tracing::warn!("Rejected message request: {}", e))?;
        log_request(&request);

        let provider = self
            .registry
            .resolve(request.provider)
            .ok_or_else(|| RelayError::UnknownProvider(request.provider.to_string()))?;

        let body = provider.complete(&request).await?;
        provider.reply_text(&body).ok_or_else(|| {
            tracing::error!("Upstream body had no reply: {}", body);
            RelayError::UpstreamTransport("upstream response contained no choices".to_string())
        })
    }
}
