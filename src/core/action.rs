//! # Actions
//!
//! Everything that can happen in parley becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! Backend sends a text fragment? That's `Action::Stream { event, .. }`.
//!
//! `update()` applies an action to the state and returns an [`Effect`] describing
//! the I/O the caller must start. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! The caller renders after every `update()`, so each mutation below is visible
//! before the next action is processed.

use log::{debug, info};

use crate::core::state::App;
use crate::core::summary::SummaryRequest;
use crate::core::turn::{TurnId, TurnRequest};
use crate::inference::{ProviderError, StreamEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Printable character typed into the input.
    InsertChar(char),
    /// Bracketed paste.
    InsertText(String),
    Backspace,
    /// Send the input buffer as a new turn.
    Submit,
    /// One backend event for `turn`.
    Stream { turn: TurnId, event: StreamEvent },
    /// The backend sequence for `turn` ended normally.
    ResponseDone { turn: TurnId },
    /// The backend sequence for `turn` failed.
    ResponseFailed { turn: TurnId, error: ProviderError },
    /// User abandoned the turn in flight.
    CancelTurn,
    SummaryReady(String),
    SummaryFailed(ProviderError),
    Quit,
}

/// Side effects requested by `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Start the worker for a freshly submitted turn.
    SpawnTurn(TurnRequest),
    /// Stop the worker of the turn that was just cancelled.
    AbortTurn,
    RefreshSummary(SummaryRequest),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::InsertChar(c) => {
            app.input.push(c);
            Effect::None
        }
        Action::InsertText(text) => {
            app.input.push_str(&text);
            Effect::None
        }
        Action::Backspace => {
            app.input.backspace();
            Effect::None
        }
        Action::Submit => submit(app),
        Action::Stream { turn, event } => {
            if !app.is_current(turn) {
                debug!("Dropping {} event from stale turn {}", event.kind(), turn);
                return Effect::None;
            }
            app.stream.apply(&event);
            Effect::None
        }
        Action::ResponseDone { turn } => {
            if !app.is_current(turn) {
                debug!("Dropping completion of stale turn {}", turn);
                return Effect::None;
            }
            let deltas = app.stream.accepted();
            let text = app.stream.finish().unwrap_or_default();
            app.busy = false;
            app.status_message = format!("Done ({} chars)", text.chars().count());
            info!(
                "Turn {} committed ({} deltas, {} bytes)",
                turn,
                deltas,
                text.len()
            );

            let user = app.log.latest_user_message().unwrap_or_default().to_string();
            app.log.push_assistant(text.clone());

            match app.summary.record_exchange(&user, &text) {
                Some(request) => Effect::RefreshSummary(request),
                None => Effect::None,
            }
        }
        Action::ResponseFailed { turn, error } => {
            if !app.is_current(turn) {
                debug!("Dropping failure of stale turn {}: {}", turn, error);
                return Effect::None;
            }
            let dropped = app.stream.discard();
            app.busy = false;
            app.status_message = format!("Error: {error}");
            app.error = Some(error.to_string());
            info!(
                "Turn {} failed, discarded {} bytes of partial output",
                turn, dropped
            );
            Effect::None
        }
        Action::CancelTurn => {
            if !app.busy {
                return Effect::None;
            }
            let dropped = app.stream.discard();
            app.busy = false;
            app.status_message = "Cancelled".to_string();
            info!(
                "Turn {} cancelled, discarded {} bytes",
                app.turn_id, dropped
            );
            Effect::AbortTurn
        }
        Action::SummaryReady(summary) => {
            app.status_message = "Summary updated".to_string();
            match app.summary.complete(summary) {
                Some(request) => Effect::RefreshSummary(request),
                None => Effect::None,
            }
        }
        Action::SummaryFailed(error) => {
            app.summary.fail();
            app.status_message = format!("Summary failed: {error}");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

/// Starts a turn from the input buffer. Blank input and submit-while-busy are
/// silent no-ops.
fn submit(app: &mut App) -> Effect {
    if app.busy {
        debug!("Submit ignored: turn {} still in flight", app.turn_id);
        return Effect::None;
    }
    if app.input.is_blank() {
        return Effect::None;
    }

    let text = app.input.take();
    app.log.push_user(text);
    app.error = None;
    app.busy = true;
    app.stream.begin();
    app.turn_id += 1;
    app.status_message = "Streaming...".to_string();

    match app.turn_request() {
        Some(request) => Effect::SpawnTurn(request),
        None => Effect::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::{Message, Role};
    use crate::core::input::InputPhase;
    use crate::test_support::test_app;

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            update(app, Action::InsertChar(c));
        }
    }

    fn delta(turn: TurnId, text: &str) -> Action {
        Action::Stream {
            turn,
            event: StreamEvent::TextDelta(text.to_string()),
        }
    }

    #[test]
    fn submit_appends_user_message_and_clears_input() {
        let mut app = test_app();
        type_text(&mut app, "Hello");

        let effect = update(&mut app, Action::Submit);

        assert_eq!(app.log.messages(), &[Message::user("Hello")]);
        assert!(app.input.is_empty(), "input must clear at submit time");
        assert!(app.busy);
        assert!(app.stream.is_active());
        assert_eq!(
            effect,
            Effect::SpawnTurn(TurnRequest {
                id: 1,
                model: "test-model".to_string(),
                input: "Hello".to_string(),
                instructions: None,
            })
        );
    }

    #[test]
    fn full_turn_commits_accumulated_text() {
        let mut app = test_app();
        type_text(&mut app, "Hello");
        update(&mut app, Action::Submit);

        for fragment in ["Hi", " there", "!"] {
            update(&mut app, delta(1, fragment));
        }
        assert_eq!(app.stream.text(), "Hi there!");
        assert_eq!(app.log.len(), 1, "nothing committed while streaming");

        update(&mut app, Action::ResponseDone { turn: 1 });

        assert_eq!(
            app.log.messages(),
            &[Message::user("Hello"), Message::assistant("Hi there!")]
        );
        assert!(!app.busy);
        assert!(!app.stream.is_active());
    }

    #[test]
    fn blank_submit_is_a_no_op() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Submit), Effect::None);

        type_text(&mut app, "   ");
        assert_eq!(update(&mut app, Action::Submit), Effect::None);
        assert!(app.log.is_empty());
        assert_eq!(app.input.as_str(), "   ");
        assert!(!app.busy);
    }

    #[test]
    fn submit_while_busy_changes_nothing() {
        let mut app = test_app();
        type_text(&mut app, "first");
        update(&mut app, Action::Submit);
        type_text(&mut app, "second");

        let log_before = app.log.clone();
        let effect = update(&mut app, Action::Submit);

        assert_eq!(effect, Effect::None);
        assert_eq!(app.log, log_before);
        assert_eq!(app.input.as_str(), "second");
        assert!(app.busy);
        assert_eq!(app.turn_id, 1);
    }

    #[test]
    fn failure_discards_partial_text() {
        let mut app = test_app();
        type_text(&mut app, "Hello");
        update(&mut app, Action::Submit);
        update(&mut app, delta(1, "Half an ans"));

        update(
            &mut app,
            Action::ResponseFailed {
                turn: 1,
                error: ProviderError::Api {
                    status: 401,
                    message: "Unauthorized".into(),
                },
            },
        );

        assert_eq!(app.log.messages(), &[Message::user("Hello")]);
        assert!(!app.busy);
        assert_eq!(app.stream.text(), "");
        assert!(app.error.as_deref().is_some_and(|e| e.contains("status=401")));
        assert_eq!(app.input_phase(), InputPhase::Idle);
    }

    #[test]
    fn input_usable_again_after_failure() {
        let mut app = test_app();
        type_text(&mut app, "one");
        update(&mut app, Action::Submit);
        update(
            &mut app,
            Action::ResponseFailed {
                turn: 1,
                error: ProviderError::Stream("overloaded".into()),
            },
        );

        type_text(&mut app, "two");
        let effect = update(&mut app, Action::Submit);
        assert!(matches!(effect, Effect::SpawnTurn(TurnRequest { id: 2, .. })));
        assert_eq!(app.error, None, "error banner cleared on next submit");
    }

    #[test]
    fn typing_while_busy_is_kept() {
        let mut app = test_app();
        type_text(&mut app, "first");
        update(&mut app, Action::Submit);

        type_text(&mut app, "ab");
        update(&mut app, Action::Backspace);
        assert_eq!(app.input.as_str(), "a");
        assert_eq!(app.input_phase(), InputPhase::Submitting);

        update(&mut app, Action::ResponseDone { turn: 1 });
        assert_eq!(app.input_phase(), InputPhase::Composing);
    }

    #[test]
    fn non_text_events_do_not_change_stream() {
        let mut app = test_app();
        type_text(&mut app, "q");
        update(&mut app, Action::Submit);
        update(
            &mut app,
            Action::Stream {
                turn: 1,
                event: StreamEvent::ReasoningDelta("pondering".into()),
            },
        );
        update(&mut app, delta(1, "A"));
        update(&mut app, Action::ResponseDone { turn: 1 });
        assert_eq!(app.log.last(), Some(&Message::assistant("A")));
    }

    #[test]
    fn empty_stream_commits_empty_reply() {
        let mut app = test_app();
        type_text(&mut app, "q");
        update(&mut app, Action::Submit);
        update(&mut app, Action::ResponseDone { turn: 1 });
        assert_eq!(app.log.len(), 2);
        assert_eq!(app.log.last().map(|m| m.role), Some(Role::Assistant));
    }

    #[test]
    fn cancel_discards_and_aborts() {
        let mut app = test_app();
        type_text(&mut app, "q");
        update(&mut app, Action::Submit);
        update(&mut app, delta(1, "par"));

        assert_eq!(update(&mut app, Action::CancelTurn), Effect::AbortTurn);
        assert!(!app.busy);
        assert_eq!(app.log.len(), 1);
        assert_eq!(app.status_message, "Cancelled");

        // Actions already queued by the aborted worker are ignored.
        update(&mut app, delta(1, "tial"));
        update(&mut app, Action::ResponseDone { turn: 1 });
        assert_eq!(app.log.len(), 1);
        assert_eq!(app.stream.text(), "");
    }

    #[test]
    fn cancel_when_idle_is_a_no_op() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::CancelTurn), Effect::None);
    }

    #[test]
    fn stale_turn_events_do_not_leak_into_new_turn() {
        let mut app = test_app();
        type_text(&mut app, "one");
        update(&mut app, Action::Submit);
        update(&mut app, Action::CancelTurn);

        type_text(&mut app, "two");
        update(&mut app, Action::Submit);
        update(&mut app, delta(1, "stale"));
        update(&mut app, delta(2, "fresh"));
        assert_eq!(app.stream.text(), "fresh");
    }

    #[test]
    fn completed_turn_requests_summary_when_enabled() {
        let mut app = test_app();
        app.summary = crate::core::summary::RollingSummary::new(true);
        type_text(&mut app, "Hello");
        update(&mut app, Action::Submit);
        update(&mut app, delta(1, "Hi"));

        let effect = update(&mut app, Action::ResponseDone { turn: 1 });
        assert_eq!(
            effect,
            Effect::RefreshSummary(SummaryRequest {
                existing: String::new(),
                new_information: "User: Hello\nAssistant: Hi\n".to_string(),
            })
        );

        assert_eq!(
            update(&mut app, Action::SummaryReady("Greeted.".into())),
            Effect::None
        );
        assert_eq!(app.summary.text(), "Greeted.");
    }

    #[test]
    fn summary_failure_keeps_previous_summary() {
        let mut app = test_app();
        app.summary = crate::core::summary::RollingSummary::new(true);
        type_text(&mut app, "Hello");
        update(&mut app, Action::Submit);
        update(&mut app, Action::ResponseDone { turn: 1 });

        update(
            &mut app,
            Action::SummaryFailed(ProviderError::Api {
                status: 429,
                message: "slow down".into(),
            }),
        );
        assert_eq!(app.summary.text(), "");
        assert!(app.status_message.contains("status=429"));
    }

    #[test]
    fn quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
