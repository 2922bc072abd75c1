mod chat_message;
mod completion_request;
mod provider_id;

pub use chat_message::{ChatMessage, Role};
pub use completion_request::{
    CompletionRequest, RawCompletionRequest, RawMessageRequest, DEFAULT_TEMPERATURE,
};
pub use provider_id::ProviderId;
