use super::{ChatMessage, ProviderId};
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_TEMPERATURE: f32 = 1.0;

/// A validated request, ready to be handed to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub provider: ProviderId,
    pub model: String,
    pub temperature: f32,
    pub platform: Option<String>,
}

/// Untrusted body of `POST /my-llp-endpoint/completions`.
///
/// Every field is kept loosely typed so that shape problems surface as
/// validation errors rather than deserialization failures. Both the
/// PascalCase spelling sent by game clients and plain lowercase are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCompletionRequest {
    #[serde(rename = "Messages", alias = "messages", default)]
    pub messages: Option<Value>,
    #[serde(rename = "SLlpProvider", alias = "sLlpProvider", alias = "provider", default)]
    pub provider: Option<Value>,
    #[serde(rename = "Model", alias = "model", default)]
    pub model: Option<Value>,
    #[serde(rename = "Temperature", alias = "temperature", default)]
    pub temperature: Option<Value>,
    #[serde(rename = "SPlatformSentFrom", alias = "sPlatformSentFrom", default)]
    pub platform: Option<Value>,
}

/// Untrusted body of the single-message `POST /my-gpt-endpoint`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessageRequest {
    #[serde(rename = "message", alias = "Message", default)]
    pub message: Option<Value>,
    #[serde(rename = "sPlatformSentFrom", alias = "SPlatformSentFrom", default)]
    pub platform: Option<Value>,
}

impl RawMessageRequest {
    pub fn from_text(message: impl Into<String>) -> Self {
        Self {
            message: Some(Value::String(message.into())),
            platform: None,
        }
    }
}
