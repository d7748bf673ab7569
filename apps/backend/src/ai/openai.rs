//! OpenAI-compatible chat-completions hint provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ai::{HintError, HintProvider};
use crate::domain::Role;

const SYSTEM_PROMPT: &str = "You are a word game assistant. Generate a helpful hint for a player \
to describe their word without saying it directly. Keep it to one sentence.";
const MAX_TOKENS: u32 = 50;
const TEMPERATURE: f32 = 0.7;

pub struct OpenAiHintProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiHintProvider {
    pub fn new(client: reqwest::Client, api_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
            model,
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

pub(crate) fn user_prompt(word: &str, role: Role) -> String {
    format!(
        "Generate a brief hint (one sentence) for a player to describe the word \"{word}\" \
without saying it directly. The player's role is {}.",
        role.as_str()
    )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// First non-blank completion, trimmed.
fn extract_hint(response: ChatResponse) -> Result<String, HintError> {
    response
        .choices
        .into_iter()
        .filter_map(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .find(|content| !content.is_empty())
        .ok_or_else(|| HintError::BadResponse("no completion content".into()))
}

#[async_trait]
impl HintProvider for OpenAiHintProvider {
    async fn generate_hint(&self, word: &str, role: Role) -> Result<String, HintError> {
        let prompt = user_prompt(word, role);
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(&prompt))
            .send()
            .await
            .map_err(|err| HintError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "hint provider returned error status");
            return Err(HintError::Transport(format!("status {status}")));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| HintError::BadResponse(err.to_string()))?;
        extract_hint(body)
    }
}
