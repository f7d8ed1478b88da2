//! Non-streaming `/chat/completions` client.
//!
//! Used for one-shot calls where the whole answer is needed before anything can be
//! shown, such as refreshing the rolling conversation summary.

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use crate::inference::ProviderError;

/// Role in a chat-completions message (OpenAI terminology)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// The decoded answer of a non-streaming call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    pub content: String,
}

pub struct ChatClient {
    name: String,
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            name: name.into(),
            api_key,
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn report(&self, model: &str, err: ProviderError) -> ProviderError {
        let status = err
            .status()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string());
        warn!(
            "{} chat completion failed for model {} (status={})",
            self.name, model, status
        );
        error!("{} chat backend error for model {}: {}", self.name, model, err);
        err
    }

    /// Sends `messages` and waits for the full answer.
    pub async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatCompletion, ProviderError> {
        let request = ChatRequest {
            model,
            messages,
            stream: false,
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.report(model, ProviderError::network(e)))?;

        debug!("{} chat response status: {}", self.name, response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(self.report(model, ProviderError::Api { status, message }));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.report(model, ProviderError::Parse(e.to_string())))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                self.report(
                    model,
                    ProviderError::Parse("response contained no message content".to_string()),
                )
            })?;

        Ok(ChatCompletion { content })
    }
}
