use async_trait::async_trait;
use relay_errors::RelayError;
use serde_json::Value;

use crate::domain::{CompletionRequest, ProviderId};

/// One upstream LLM backend: knows its request and response shapes.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Issue exactly one completion call and return the upstream body as-is.
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, RelayError>;

    /// Return the upstream model listing as-is.
    async fn list_models(&self) -> Result<Value, RelayError>;

    /// Extract the single reply text from a completion body.
    fn reply_text(&self, body: &Value) -> Option<String>;
}
