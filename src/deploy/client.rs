//! OpenAI-compatible chat completion client.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use super::{GenerateError, TextGenerator};

/// Model requested when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// [`TextGenerator`] backed by a `POST {base}/chat/completions` endpoint.
#[derive(Debug)]
pub struct ChatClient {
    agent: ureq::Agent,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AnswerMessage,
}

#[derive(Deserialize)]
struct AnswerMessage {
    content: Option<String>,
}

impl ChatClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// `model` defaults to [`DEFAULT_MODEL`].
    #[must_use]
    pub fn new(base_url: &str, api_key: Option<String>, model: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(120))
            .timeout_write(Duration::from_secs(30))
            .build();
        Self {
            agent,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
        }
    }

    /// The URL requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TextGenerator for ChatClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let body = serde_json::to_string(&ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        })
        .map_err(GenerateError::Payload)?;

        let mut request = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            request = request.set("Authorization", &format!("Bearer {key}"));
        }
        info!(endpoint = %self.endpoint, model = %self.model, "requesting chat completion");
        let response = request
            .send_string(&body)
            .map_err(|err| GenerateError::Transport(Box::new(err)))?;
        let text = response.into_string().map_err(GenerateError::Read)?;
        let parsed: ChatResponse = serde_json::from_str(&text).map_err(GenerateError::Payload)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_owned())
            .filter(|content| !content.is_empty())
            .ok_or(GenerateError::EmptyAnswer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://llm.local/v1", "http://llm.local/v1/chat/completions")]
    #[case("http://llm.local/v1/", "http://llm.local/v1/chat/completions")]
    fn endpoint_joins_base_url(#[case] base: &str, #[case] expected: &str) {
        let client = ChatClient::new(base, None, None);
        assert_eq!(client.endpoint(), expected);
        assert_eq!(client.model, DEFAULT_MODEL);
    }

    #[rstest]
    fn request_payload_has_one_user_message() {
        let json = serde_json::to_value(ChatRequest {
            model: "m",
            messages: [ChatMessage {
                role: "user",
                content: "hi",
            }],
        })
        .expect("serialise");
        assert_eq!(
            json,
            serde_json::json!({
                "model": "m",
                "messages": [{ "role": "user", "content": "hi" }],
            })
        );
    }
}
