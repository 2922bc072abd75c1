use async_trait::async_trait;
use relay_errors::RelayError;
use serde_json::Value;

use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::config::RelayConfig;
use crate::domain::{CompletionRequest, ProviderId};
use crate::infrastructure::providers::CompletionProvider;

const COMPLETIONS_PATH: &str = "/v1/chat/completions";
const MODELS_PATH: &str = "/v1/models";

pub struct OpenAiClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.api_key.clone(), config.openai_base_url.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, RelayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OpenAI error: {} - {}", status, body);
            return Err(RelayError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RelayError::UpstreamTransport(e.to_string()))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Value, RelayError> {
        let payload = ChatCompletionRequest::from_request(request);

        let response = self
            .authorize(self.http_client.post(self.endpoint(COMPLETIONS_PATH)))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenAI request failed: {}", e);
                RelayError::UpstreamTransport(e.to_string())
            })?;

        Self::read_json(response).await
    }

    async fn list_models(&self) -> Result<Value, RelayError> {
        let response = self
            .authorize(self.http_client.get(self.endpoint(MODELS_PATH)))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenAI model listing failed: {}", e);
                RelayError::UpstreamTransport(e.to_string())
            })?;

        Self::read_json(response).await
    }

    fn reply_text(&self, body: &Value) -> Option<String> {
        serde_json::from_value::<ChatCompletionResponse>(body.clone())
            .ok()?
            .first_reply()
    }
}
