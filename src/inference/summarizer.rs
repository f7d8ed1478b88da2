//! Rolling conversation summary.
//!
//! Folds each finished exchange into a short running summary with a single
//! non-streaming call. The summary is memory for the user, not model context:
//! turns still send only the latest message.

use log::info;

use crate::inference::ProviderError;
use crate::inference::providers::chat::{ChatClient, ChatMessage};

pub const DEFAULT_SUMMARY_INSTRUCTION: &str = "You maintain a running summary of a conversation. \
    Merge the new information into the existing summary. Keep it under 150 words, \
    keep concrete facts, names and decisions, and drop small talk. \
    Reply with the updated summary only.";

pub struct Summarizer {
    client: ChatClient,
    model: String,
    instruction: String,
}

impl Summarizer {
    pub fn new(client: ChatClient, model: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            instruction: instruction.into(),
        }
    }

    /// Builds the user prompt carrying the existing summary and the new information.
    pub fn prompt(existing: &str, new_information: &str) -> String {
        let existing = if existing.trim().is_empty() {
            "(none yet)"
        } else {
            existing.trim()
        };
        format!(
            "Existing summary:\n{existing}\n\nNew information:\n{}",
            new_information.trim()
        )
    }

    /// Returns the refreshed summary. Errors are logged by the client before they
    /// reach the caller.
    pub async fn refresh(&self, existing: &str, new_information: &str) -> Result<String, ProviderError> {
        let messages = [
            ChatMessage::system(self.instruction.as_str()),
            ChatMessage::user(Self::prompt(existing, new_information)),
        ];
        let completion = self.client.complete(&self.model, &messages).await?;
        let summary = completion.content.trim().to_string();
        info!("Summary refreshed ({} chars)", summary.len());
        Ok(summary)
    }
}
