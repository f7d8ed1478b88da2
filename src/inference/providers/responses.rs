//! Streaming provider for OpenAI-compatible `/responses` endpoints.
//!
//! OpenAI, OpenRouter, LM Studio and Ollama all expose the Responses API, so one
//! implementation serves every configured backend. Only the latest user message is
//! sent as `input`; the conversation history stays on the client.
//!
//! SSE events used here:
//! - `response.output_text.delta`: answer text fragment
//! - `response.reasoning_text.delta`, `response.reasoning_summary_text.delta`: reasoning
//! - `response.completed`: end of stream
//! - `response.failed`, `error`: backend failure inside the stream

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::Sender;

use crate::inference::{CompletionProvider, CompletionRequest, ProviderError, StreamEvent};

// ============================================================================
// Responses API Types
// ============================================================================

/// The request body for the Responses API
#[derive(Serialize, Debug)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<&'a str>,
    stream: bool,
}

/// Generic SSE payload. Some backends embed the event type in the JSON
/// instead of sending `event:` lines.
#[derive(Deserialize, Debug)]
struct SseEvent {
    #[serde(rename = "type", default)]
    event_type: String,
    #[serde(default)]
    delta: String,
}

// ============================================================================
// SSE Classification
// ============================================================================

/// Turns one SSE `data:` payload into a stream event.
///
/// `Ok(None)` means the payload carries nothing worth forwarding (empty deltas).
fn classify(event_type: &str, data: &str) -> Result<Option<StreamEvent>, ProviderError> {
    match event_type {
        "response.output_text.delta" => {
            let event: SseEvent = serde_json::from_str(data)
                .map_err(|e| ProviderError::Parse(format!("{event_type}: {e}")))?;
            Ok((!event.delta.is_empty()).then_some(StreamEvent::TextDelta(event.delta)))
        }
        "response.reasoning_text.delta" | "response.reasoning_summary_text.delta" => {
            let event: SseEvent = serde_json::from_str(data)
                .map_err(|e| ProviderError::Parse(format!("{event_type}: {e}")))?;
            Ok((!event.delta.is_empty()).then_some(StreamEvent::ReasoningDelta(event.delta)))
        }
        "response.completed" => Ok(Some(StreamEvent::Completed)),
        "response.failed" | "error" => Err(ProviderError::Stream(failure_message(data))),
        other => Ok(Some(StreamEvent::Other(other.to_string()))),
    }
}

/// Pulls a human-readable message out of a failure payload.
fn failure_message(data: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(data) else {
        return data.to_string();
    };
    ["/response/error/message", "/error/message", "/message"]
        .iter()
        .find_map(|pointer| value.pointer(pointer).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| data.to_string())
}

/// Resolves the event type for a `data:` payload: the preceding `event:` line wins,
/// otherwise the JSON's own `type` field.
fn resolve_event_type(pending: Option<String>, data: &str) -> Option<String> {
    pending.or_else(|| {
        serde_json::from_str::<SseEvent>(data)
            .ok()
            .map(|e| e.event_type)
            .filter(|t| !t.is_empty())
    })
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Responses API provider shared by every backend kind.
pub struct ResponsesProvider {
    name: String,
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl ResponsesProvider {
    /// Creates a provider.
    ///
    /// # Arguments
    /// * `name` - Backend name used in logs (e.g. "ollama")
    /// * `base_url` - API base, already normalized (e.g. `http://localhost:11434/v1`)
    /// * `api_key` - Bearer token; local backends run without one
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            name: name.into(),
            api_key,
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Logs a backend failure once at warn (context) and once at error (details).
    fn report(&self, model: &str, operation: &str, err: ProviderError) -> ProviderError {
        let status = err
            .status()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string());
        warn!(
            "{} {} failed for model {} (status={})",
            self.name, operation, model, status
        );
        error!("{} backend error for model {}: {}", self.name, model, err);
        err
    }

    /// Sends a request to the Responses endpoint and returns the response.
    async fn send_request(
        &self,
        request: &ResponsesRequest<'_>,
    ) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}/responses", self.base_url);
        debug!(
            "{} request: {}",
            self.name,
            serde_json::to_string(request).unwrap_or_default()
        );

        let mut builder = self.client.post(&url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.report(request.model, "request", ProviderError::network(e)))?;

        debug!("{} response status: {}", self.name, response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(self.report(
                request.model,
                "request",
                ProviderError::Api { status, message },
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionProvider for ResponsesProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stream_completion(
        &self,
        request: CompletionRequest<'_>,
        sender: Sender<StreamEvent>,
    ) -> Result<(), ProviderError> {
        let body = ResponsesRequest {
            model: request.model,
            input: request.input,
            instructions: request.instructions,
            stream: true,
        };

        info!(
            "{} Responses API request: model={}, input_len={}",
            self.name,
            request.model,
            request.input.len()
        );

        let response = self.send_request(&body).await?;
        let mut stream = response.bytes_stream();

        // Bytes are buffered until a full line arrives so multi-byte characters
        // split across chunks decode correctly.
        let mut buffer: Vec<u8> = Vec::new();
        let mut current_event_type: Option<String> = None;
        let mut total_content_len = 0usize;
        let mut event_count = 0usize;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| self.report(request.model, "stream", ProviderError::network(e)))?;
            debug!("Raw chunk received: {} bytes", chunk.len());
            buffer.extend_from_slice(&chunk);

            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let raw: Vec<u8> = buffer.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&raw);
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                if let Some(event_type) = line.strip_prefix("event:") {
                    current_event_type = Some(event_type.trim().to_string());
                    continue;
                }

                let Some(data) = line.strip_prefix("data:").map(str::trim_start) else {
                    debug!("Skipping non-data SSE line: {}", line);
                    continue;
                };

                if data == "[DONE]" {
                    debug!("Received [DONE] marker");
                    continue;
                }

                let Some(event_type) = resolve_event_type(current_event_type.take(), data)
                else {
                    debug!("Could not determine event type for data: {}", data);
                    continue;
                };

                let event = classify(&event_type, data)
                    .map_err(|e| self.report(request.model, "stream", e))?;
                let Some(event) = event else {
                    continue;
                };

                event_count += 1;
                if let Some(text) = event.text() {
                    total_content_len += text.len();
                    debug!(
                        "Sending text delta (len={}, total={})",
                        text.len(),
                        total_content_len
                    );
                } else {
                    debug!("Sending {} event", event.kind());
                }

                let completed = event == StreamEvent::Completed;
                if sender.send(event).await.is_err() {
                    warn!("{} event send failed: receiver dropped", self.name);
                    return Err(ProviderError::ChannelClosed);
                }
                if completed {
                    info!(
                        "Stream complete: {} events, {} content bytes",
                        event_count, total_content_len
                    );
                    return Ok(());
                }
            }
        }

        info!(
            "Stream ended: {} events, {} content bytes",
            event_count, total_content_len
        );
        Ok(())
    }
}
