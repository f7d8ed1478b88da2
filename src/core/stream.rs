//! # Stream Aggregator
//!
//! Accumulates the text deltas of the active turn. The accumulated value only ever
//! grows, in arrival order, and is readable after every accepted delta so the render
//! loop can show it before the next one arrives.

use crate::inference::StreamEvent;

/// In-progress text of the active turn.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StreamState {
    text: String,
    active: bool,
    accepted: usize,
}

impl StreamState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to an empty, active stream.
    pub fn begin(&mut self) {
        self.text.clear();
        self.active = true;
        self.accepted = 0;
    }

    /// Applies one event. Returns `true` if it grew the accumulated text.
    ///
    /// Non-text kinds, empty fragments and events arriving while inactive are ignored.
    pub fn apply(&mut self, event: &StreamEvent) -> bool {
        if !self.active {
            return false;
        }
        match event.text() {
            Some(fragment) if !fragment.is_empty() => {
                self.text.push_str(fragment);
                self.accepted += 1;
                true
            }
            _ => false,
        }
    }

    /// Ends the stream and hands over the complete response.
    pub fn finish(&mut self) -> Option<String> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.accepted = 0;
        Some(std::mem::take(&mut self.text))
    }

    /// Ends the stream and drops whatever was accumulated. Returns the number of
    /// bytes thrown away.
    pub fn discard(&mut self) -> usize {
        let dropped = self.text.len();
        self.text.clear();
        self.active = false;
        self.accepted = 0;
        dropped
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of text deltas accepted since `begin`.
    pub fn accepted(&self) -> usize {
        self.accepted
    }
}
