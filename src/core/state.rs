//! # Application State
//!
//! Core business state for parley. Domain logic only, no TUI types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── provider: Arc<dyn CompletionProvider>  // streaming backend
//! ├── provider_name / model_name             // shown in the header
//! ├── instructions: Option<String>           // system prompt sent with each turn
//! ├── log: ConversationLog                   // finalized messages only
//! ├── input: InputBuffer                     // pending outgoing text
//! ├── stream: StreamState                    // in-progress answer
//! ├── busy: bool                             // a turn is in flight
//! ├── turn_id: TurnId                        // id of the latest turn
//! ├── status_message: String                 // header status text
//! ├── error: Option<String>                  // last turn failure
//! └── summary: RollingSummary                // optional memory
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::config::ResolvedConfig;
use crate::core::conversation::ConversationLog;
use crate::core::input::{InputBuffer, InputPhase};
use crate::core::stream::StreamState;
use crate::core::summary::RollingSummary;
use crate::core::turn::{TurnId, TurnRequest};
use crate::inference::CompletionProvider;

pub struct App {
    pub provider: Arc<dyn CompletionProvider>,
    pub provider_name: String,
    pub model_name: String,
    pub instructions: Option<String>,
    pub log: ConversationLog,
    pub input: InputBuffer,
    pub stream: StreamState,
    pub busy: bool,
    pub turn_id: TurnId,
    pub status_message: String,
    pub error: Option<String>,
    pub summary: RollingSummary,
}

impl App {
    pub fn new(provider: Arc<dyn CompletionProvider>, model_name: String) -> Self {
        let provider_name = provider.name().to_string();
        Self {
            provider,
            provider_name,
            model_name,
            instructions: None,
            log: ConversationLog::new(),
            input: InputBuffer::new(),
            stream: StreamState::new(),
            busy: false,
            turn_id: 0,
            status_message: String::from("Ready"),
            error: None,
            summary: RollingSummary::new(false),
        }
    }

    pub fn from_config(provider: Arc<dyn CompletionProvider>, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(provider, config.model_name.clone());
        app.instructions = config.system_prompt.clone();
        app.summary = RollingSummary::new(config.summary.enabled);
        app
    }

    pub fn input_phase(&self) -> InputPhase {
        InputPhase::of(&self.input, self.busy)
    }

    /// True if `turn` is the one currently streaming.
    pub fn is_current(&self, turn: TurnId) -> bool {
        self.busy && turn == self.turn_id
    }

    /// Request for the current turn: the latest user message and nothing else.
    pub fn turn_request(&self) -> Option<TurnRequest> {
        let input = self.log.latest_user_message()?;
        Some(TurnRequest {
            id: self.turn_id,
            model: self.model_name.clone(),
            input: input.to_string(),
            instructions: self.instructions.clone(),
        })
    }
}
