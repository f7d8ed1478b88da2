//! # Input Buffer
//!
//! Pending outgoing text. Characters are only ever appended at the end or removed
//! from the end; the buffer is emptied exactly once per accepted submit.
//!
//! ```text
//!            char                 submit (non-blank, not busy)
//!   Idle ─────────────► Composing ─────────────────────────► Submitting
//!    ▲                   │    ▲                                   │
//!    └── backspace ──────┘    └──────── busy cleared ─────────────┘
//!        (to empty)
//! ```

/// Where the input side of the UI currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPhase {
    Idle,
    Composing,
    Submitting,
}

impl InputPhase {
    /// Derives the phase from the buffer and the busy flag. A turn in flight always
    /// reads as `Submitting`, even while the user keeps typing.
    pub fn of(buffer: &InputBuffer, busy: bool) -> Self {
        if busy {
            InputPhase::Submitting
        } else if buffer.is_empty() {
            InputPhase::Idle
        } else {
            InputPhase::Composing
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when there is nothing worth sending.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Removes the trailing character. Returns `false` if the buffer was empty.
    pub fn backspace(&mut self) -> bool {
        self.text.pop().is_some()
    }

    /// Empties the buffer and returns what it held.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_then_backspace() {
        let mut input = InputBuffer::new();
        input.push('h');
        input.push('é');
        assert_eq!(input.as_str(), "hé");

        assert!(input.backspace());
        assert_eq!(input.as_str(), "h");
        assert!(input.backspace());
        assert!(!input.backspace());
        assert!(input.is_empty());
    }

    #[test]
    fn whitespace_only_is_blank() {
        let mut input = InputBuffer::new();
        input.push_str("  \n\t");
        assert!(input.is_blank());
        assert!(!input.is_empty());
    }

    #[test]
    fn take_clears_buffer() {
        let mut input = InputBuffer::new();
        input.push_str("hello");
        assert_eq!(input.take(), "hello");
        assert!(input.is_empty());
    }

    #[test]
    fn phase_transitions() {
        let mut input = InputBuffer::new();
        assert_eq!(InputPhase::of(&input, false), InputPhase::Idle);

        input.push('a');
        assert_eq!(InputPhase::of(&input, false), InputPhase::Composing);
        assert_eq!(InputPhase::of(&input, true), InputPhase::Submitting);

        input.backspace();
        assert_eq!(InputPhase::of(&input, false), InputPhase::Idle);
    }
}
