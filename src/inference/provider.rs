use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use super::types::StreamEvent;

/// Errors that can occur while talking to a model backend.
///
/// Every variant that originates from an HTTP response carries the status code so
/// callers can pattern-match on `status=<code>` in the rendered message.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Provider misconfigured (missing API key, bad URL).
    Config(String),
    /// Transport failure (connect, DNS, body read). Status is set when the
    /// transport error was attached to a response.
    Network { status: Option<u16>, message: String },
    /// Backend answered with a non-success status.
    Api { status: u16, message: String },
    /// Backend reported a failure inside an otherwise healthy stream.
    Stream(String),
    /// Backend response could not be decoded.
    Parse(String),
    /// The event receiver was dropped before the stream finished.
    ChannelClosed,
}

impl ProviderError {
    /// HTTP status associated with this error, if there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            ProviderError::Network { status, .. } => *status,
            _ => None,
        }
    }

    pub(crate) fn network(err: reqwest::Error) -> Self {
        ProviderError::Network {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network {
                status: Some(status),
                message,
            } => write!(f, "network error (status={status}): {message}"),
            ProviderError::Network {
                status: None,
                message,
            } => write!(f, "network error: {message}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (status={status}): {message}")
            }
            ProviderError::Stream(msg) => write!(f, "stream failed: {msg}"),
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
            ProviderError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything a provider needs to fulfill one streamed turn.
///
/// `input` is the latest user message only. Prior turns are displayed but never
/// replayed to the backend.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub input: &'a str,
    pub instructions: Option<&'a str>,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Streams a completion, sending events to `sender` in arrival order.
    ///
    /// Returns `Ok(())` when the backend ends the stream normally. Any error means the
    /// events already sent must not be treated as a complete response.
    async fn stream_completion(
        &self,
        request: CompletionRequest<'_>,
        sender: Sender<StreamEvent>,
    ) -> Result<(), ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_contains_status() {
        let err = ProviderError::Api {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("status=401"), "got: {rendered}");
        assert!(rendered.contains("Unauthorized"));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn network_error_display_includes_status_when_known() {
        let with_status = ProviderError::Network {
            status: Some(502),
            message: "bad gateway".to_string(),
        };
        assert!(with_status.to_string().contains("status=502"));

        let without = ProviderError::Network {
            status: None,
            message: "connection refused".to_string(),
        };
        assert!(!without.to_string().contains("status="));
        assert_eq!(without.status(), None);
    }

    #[test]
    fn stream_error_has_no_status() {
        let err = ProviderError::Stream("server_error".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "stream failed: server_error");
    }
}
