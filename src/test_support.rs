//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::core::state::App;
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError, StreamEvent};

/// Provider that replays a fixed event script and records what it was asked.
pub struct ScriptedProvider {
    events: Vec<StreamEvent>,
    failure: Option<ProviderError>,
    inputs: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(events: Vec<StreamEvent>) -> Self {
        Self {
            events,
            failure: None,
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Text deltas followed by a normal completion.
    pub fn text(fragments: &[&str]) -> Self {
        let mut events: Vec<StreamEvent> = fragments
            .iter()
            .map(|f| StreamEvent::TextDelta(f.to_string()))
            .collect();
        events.push(StreamEvent::Completed);
        Self::new(events)
    }

    /// Ends the script with `error` instead of a completion.
    pub fn failing_with(mut self, error: ProviderError) -> Self {
        if self.events.last() == Some(&StreamEvent::Completed) {
            self.events.pop();
        }
        self.failure = Some(error);
        self
    }

    /// Inputs received so far, one per turn.
    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn stream_completion(
        &self,
        request: CompletionRequest<'_>,
        sender: Sender<StreamEvent>,
    ) -> Result<(), ProviderError> {
        self.inputs.lock().unwrap().push(request.input.to_string());
        for event in &self.events {
            sender
                .send(event.clone())
                .await
                .map_err(|_| ProviderError::ChannelClosed)?;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Creates a test App backed by an empty script.
pub fn test_app() -> App {
    App::new(Arc::new(ScriptedProvider::text(&[])), "test-model".to_string())
}
