//! Model client (raw HTTP via reqwest)
//!
//! Talks to an OpenAI-compatible chat-completions endpoint. One request
//! in, one text response out: no retries, no streaming.

use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::{GatewayError, Result};
use crate::models::ChatMessage;

const ENDPOINT_CHAT: &str = "/chat/completions";

// == Wire Types ==

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

// == Model Client ==
/// Client for the configured chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ModelClient {
    http: reqwest::Client,
    config: ModelConfig,
}

impl ModelClient {
    /// Creates a client from the model configuration.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    // == Complete ==
    /// Issues exactly one completion call: the system prompt followed by
    /// the given messages. Returns the first choice's text.
    pub async fn complete(
        &self,
        system: String,
        messages: Vec<ChatMessage>,
    ) -> Result<String> {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(ChatMessage {
            role: "system".to_string(),
            content: system,
        });
        wire.extend(messages);

        let url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            ENDPOINT_CHAT
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&CompletionRequest {
                model: &self.config.model,
                messages: &wire,
            })
            .send()
            .await
            .map_err(|e| GatewayError::Model(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Model(e.to_string()))?;

        if !status.is_success() {
            return Err(GatewayError::Model(format!("status {status}: {body}")));
        }

        let parsed: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::Model(format!("invalid response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GatewayError::Model("no choices in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_response_parsing() {
        let body = r#"{
            "id": "cmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "hello" }, "finish_reason": "stop" }
            ],
            "usage": { "prompt_tokens": 10, "completion_tokens": 2 }
        }"#;

        let parsed: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "hello");
    }

    #[test]
    fn test_completion_request_shape() {
        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: "hi".to_string(),
        }];
        let request = CompletionRequest {
            model: "llama-3-8b-instruct",
            messages: &messages,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama-3-8b-instruct");
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
