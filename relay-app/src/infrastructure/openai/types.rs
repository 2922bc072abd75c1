use serde::{Deserialize, Serialize};

use crate::domain::CompletionRequest;

const TOP_P: f32 = 0.7;
const CHOICE_COUNT: u32 = 1;

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub top_p: f32,
    pub n: u32,
    pub stream: bool,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: MessageContent,
}

#[derive(Debug, Deserialize)]
pub struct MessageContent {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionRequest {
    pub fn from_request(request: &CompletionRequest) -> Self {
        Self {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| Message {
                    role: m.role().as_str().to_string(),
                    content: m.content().to_string(),
                })
                .collect(),
            temperature: request.temperature,
            top_p: TOP_P,
            n: CHOICE_COUNT,
            stream: false,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
        }
    }
}

impl ChatCompletionResponse {
    pub fn first_reply(self) -> Option<String> {
        self.choices.into_iter().next()?.message.content
    }
}
