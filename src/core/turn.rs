//! # Turn Driver
//!
//! The worker half of a turn. It pulls the backend's event sequence and hands each
//! event back as an [`Action`] in arrival order, then exactly one terminal action:
//! `ResponseDone` when the sequence ended normally, `ResponseFailed` otherwise.
//!
//! ```text
//!   provider.stream_completion ──mpsc──► forward loop ──emit──► Action::Stream
//!                 │                                              ...
//!                 └── Ok / Err ─────────────────────────emit──► ResponseDone | ResponseFailed
//! ```
//!
//! Both halves run on the same task via `tokio::join!`, so the terminal action can
//! only be emitted after every event has been forwarded.

use log::{debug, info};
use tokio::sync::mpsc;

use crate::core::action::Action;
use crate::inference::{CompletionProvider, CompletionRequest, StreamEvent};

/// Identifies a turn. Increases by one per accepted submit.
pub type TurnId = u64;

/// Capacity of the provider → forwarder channel.
pub const STREAM_BUFFER: usize = 100;

/// Everything the worker needs to run one turn, detached from `App`.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRequest {
    pub id: TurnId,
    pub model: String,
    /// Latest user message only.
    pub input: String,
    pub instructions: Option<String>,
}

impl TurnRequest {
    pub fn as_completion(&self) -> CompletionRequest<'_> {
        CompletionRequest {
            model: &self.model,
            input: &self.input,
            instructions: self.instructions.as_deref(),
        }
    }
}

/// Runs one turn against `provider`, emitting actions through `emit`.
pub async fn stream_turn<F>(provider: &dyn CompletionProvider, turn: &TurnRequest, mut emit: F)
where
    F: FnMut(Action),
{
    info!(
        "Turn {} started: provider={}, model={}",
        turn.id,
        provider.name(),
        turn.model
    );

    let (tx, mut rx) = mpsc::channel::<StreamEvent>(STREAM_BUFFER);

    let forward = async {
        let mut forwarded = 0usize;
        while let Some(event) = rx.recv().await {
            forwarded += 1;
            debug!("Turn {} forwarding {} event", turn.id, event.kind());
            emit(Action::Stream {
                turn: turn.id,
                event,
            });
        }
        forwarded
    };

    let (result, forwarded) =
        tokio::join!(provider.stream_completion(turn.as_completion(), tx), forward);

    match result {
        Ok(()) => {
            info!("Turn {} completed after {} events", turn.id, forwarded);
            emit(Action::ResponseDone { turn: turn.id });
        }
        Err(error) => {
            info!(
                "Turn {} failed after {} events: {}",
                turn.id, forwarded, error
            );
            emit(Action::ResponseFailed {
                turn: turn.id,
                error,
            });
        }
    }
}
