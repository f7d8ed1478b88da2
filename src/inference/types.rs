/// One event of a streamed response, in the order the backend produced it.
///
/// Only [`StreamEvent::TextDelta`] contributes to the visible answer. Every other kind
/// is passed through so the caller can log or count it, and is otherwise ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A fragment of the answer text.
    TextDelta(String),
    /// A fragment of the model's reasoning trace.
    ReasoningDelta(String),
    /// Any other event kind the backend sent (e.g. `response.created`).
    Other(String),
    /// The backend signalled the end of the response.
    Completed,
}

impl StreamEvent {
    /// The text fragment carried by this event, if it is a text delta.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::TextDelta(text) => Some(text),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &str {
        match self {
            StreamEvent::TextDelta(_) => "text_delta",
            StreamEvent::ReasoningDelta(_) => "reasoning_delta",
            StreamEvent::Other(kind) => kind,
            StreamEvent::Completed => "completed",
        }
    }
}
