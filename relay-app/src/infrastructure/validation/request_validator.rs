use relay_errors::RelayError;
use serde_json::{Map, Value};

use crate::domain::{
    ChatMessage, CompletionRequest, ProviderId, RawCompletionRequest, RawMessageRequest, Role,
    DEFAULT_TEMPERATURE,
};
use crate::infrastructure::providers::ProviderRegistry;

const ROLE_KEYS: &[&str] = &["Role", "role"];
const CONTENT_KEYS: &[&str] = &["Content", "content"];

pub struct RequestValidator;

impl RequestValidator {
    /// Checks run in a fixed order and the first failure wins:
    /// messages, each message, provider, model, temperature.
    pub fn validate_completion(
        raw: RawCompletionRequest,
        registry: &ProviderRegistry,
    ) -> Result<CompletionRequest, RelayError> {
        let items = match raw.messages {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => return Err(RelayError::NoMessages),
        };

        let messages = items
            .iter()
            .map(Self::validate_message)
            .collect::<Result<Vec<_>, _>>()?;

        let provider = Self::validate_provider(raw.provider.as_ref(), registry)?;

        let model = match raw.model {
            Some(Value::String(model)) if !model.trim().is_empty() => model,
            _ => return Err(RelayError::NoModel),
        };

        let temperature = match raw.temperature {
            None => DEFAULT_TEMPERATURE,
            Some(Value::Number(n)) => n.as_f64().ok_or(RelayError::InvalidTemperature)? as f32,
            Some(_) => return Err(RelayError::InvalidTemperature),
        };
        if !temperature.is_finite() {
            return Err(RelayError::InvalidTemperature);
        }

        Ok(CompletionRequest {
            messages,
            provider,
            model,
            temperature,
            platform: Self::platform(raw.platform),
        })
    }

    /// Wraps a single legacy message into a one-turn user conversation.
    pub fn validate_message_request(
        raw: RawMessageRequest,
        default_model: &str,
    ) -> Result<CompletionRequest, RelayError> {
        let content = match raw.message {
            Some(Value::String(text)) if !text.trim().is_empty() => text,
            _ => return Err(RelayError::NoMessage),
        };

        Ok(CompletionRequest {
            messages: vec![ChatMessage::user(content)?],
            provider: ProviderId::default(),
            model: default_model.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            platform: Self::platform(raw.platform),
        })
    }

    fn validate_message(item: &Value) -> Result<ChatMessage, RelayError> {
        let object = item.as_object().ok_or(RelayError::InvalidMessage)?;
        let role = non_empty_str(object, ROLE_KEYS).ok_or(RelayError::InvalidMessage)?;
        let content = non_empty_str(object, CONTENT_KEYS).ok_or(RelayError::InvalidMessage)?;
        ChatMessage::new(role.parse::<Role>()?, content)
    }

    fn validate_provider(
        raw: Option<&Value>,
        registry: &ProviderRegistry,
    ) -> Result<ProviderId, RelayError> {
        let name = match raw {
            Some(Value::String(name)) => name.clone(),
            Some(other) => return Err(RelayError::UnknownProvider(other.to_string())),
            None => return Err(RelayError::MissingProvider),
        };

        let id = name.parse::<ProviderId>()?;
        if !registry.contains(id) {
            return Err(RelayError::UnknownProvider(name));
        }
        Ok(id)
    }

    fn platform(raw: Option<Value>) -> Option<String> {
        match raw {
            Some(Value::String(platform)) if !platform.is_empty() => Some(platform),
            _ => None,
        }
    }
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| object.get(*key))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}
