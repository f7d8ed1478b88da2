//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! One thread owns `App`. Two sources feed it actions:
//!
//! ```text
//!   crossterm events ──map──► Action ─┐
//!                                     ├──► update() ──► draw ──► Effect
//!   turn / summary tasks ──mpsc──────►┘
//! ```
//!
//! The frame is redrawn after every single `update()`, so each streamed fragment
//! and the input clearing on submit are on screen before the next action runs.
//! While a turn is in flight the loop also redraws on a short tick to animate
//! the spinner.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::core::summary::SummaryRequest;
use crate::core::turn::{TurnRequest, stream_turn};
use crate::inference::{CompletionProvider, Summarizer};
use crate::tui::component::EventHandler;
use crate::tui::components::MessageListState;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Poll timeout while a turn is streaming (spinner cadence).
const BUSY_TICK: Duration = Duration::from_millis(80);
/// Poll timeout while idle.
const IDLE_TICK: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
        }
    }
}

/// Terminal modes on top of `ratatui::init`. Dropping it undoes both.
struct TerminalModeGuard;

impl TerminalModeGuard {
    fn enable() -> Self {
        match execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        ) {
            Ok(()) => info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)"),
            Err(e) => warn!("Failed to enable terminal modes: {}", e),
        }
        Self
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
        ratatui::restore();
    }
}

/// Runs the effects returned by `update()`. Owns the handles of background work.
struct EffectRunner {
    tx: mpsc::Sender<Action>,
    summarizer: Option<Arc<Summarizer>>,
    active_turn: Option<AbortHandle>,
}

impl EffectRunner {
    /// Applies `action` and runs its effect. Returns true when the app should quit.
    fn dispatch(&mut self, app: &mut App, action: Action) -> bool {
        match update(app, action) {
            Effect::None => false,
            Effect::Quit => true,
            Effect::SpawnTurn(request) => {
                if let Some(previous) = self.active_turn.take() {
                    previous.abort();
                }
                self.active_turn = Some(spawn_turn(
                    Arc::clone(&app.provider),
                    request,
                    self.tx.clone(),
                ));
                false
            }
            Effect::AbortTurn => {
                if let Some(handle) = self.active_turn.take() {
                    info!("Aborting turn {}", app.turn_id);
                    handle.abort();
                }
                false
            }
            Effect::RefreshSummary(request) => {
                match &self.summarizer {
                    Some(summarizer) => {
                        spawn_summary(Arc::clone(summarizer), request, self.tx.clone());
                    }
                    None => debug!("Summary refresh requested but no summarizer configured"),
                }
                false
            }
        }
    }

    fn shutdown(&mut self) {
        if let Some(handle) = self.active_turn.take() {
            handle.abort();
        }
    }
}

pub fn run(
    config: &ResolvedConfig,
    provider: Arc<dyn CompletionProvider>,
    summarizer: Option<Summarizer>,
) -> std::io::Result<()> {
    let mut app = App::from_config(provider, config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::enable();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut runner = EffectRunner {
        tx,
        summarizer: summarizer.map(Arc::new),
        active_turn: None,
    };

    let start_time = Instant::now();
    let spinner_frame = || (start_time.elapsed().as_secs_f32() * 12.0) as usize;

    terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame()))?;

    'event_loop: loop {
        let timeout = if app.busy { BUSY_TICK } else { IDLE_TICK };
        let first_event = poll_event_timeout(timeout);

        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = action_for(&event, &app) {
                if runner.dispatch(&mut app, action) {
                    break 'event_loop;
                }
            } else {
                tui.message_list.handle_event(&event);
            }
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame()))?;
        }

        // Background task actions (streamed fragments, turn completion, summaries)
        while let Ok(action) = rx.try_recv() {
            if runner.dispatch(&mut app, action) {
                break 'event_loop;
            }
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame()))?;
        }

        if app.busy {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame()))?;
        }
    }

    runner.shutdown();
    info!("parley shutting down after {} messages", app.log.len());
    Ok(())
}

/// Maps a terminal event to a core action. Scroll and resize events stay in the TUI.
fn action_for(event: &TuiEvent, app: &App) -> Option<Action> {
    match event {
        TuiEvent::ForceQuit => Some(Action::Quit),
        TuiEvent::Escape if app.busy => Some(Action::CancelTurn),
        TuiEvent::Escape => Some(Action::Quit),
        TuiEvent::Submit => Some(Action::Submit),
        TuiEvent::InputChar(c) => Some(Action::InsertChar(*c)),
        TuiEvent::Paste(text) => Some(Action::InsertText(text.clone())),
        TuiEvent::Backspace => Some(Action::Backspace),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom
        | TuiEvent::Resize => None,
    }
}

fn spawn_turn(
    provider: Arc<dyn CompletionProvider>,
    request: TurnRequest,
    tx: mpsc::Sender<Action>,
) -> AbortHandle {
    info!("Spawning turn {} (model={})", request.id, request.model);
    let handle = tokio::spawn(async move {
        stream_turn(provider.as_ref(), &request, |action| {
            if tx.send(action).is_err() {
                debug!("Event loop gone, dropping action for turn {}", request.id);
            }
        })
        .await;
    });
    handle.abort_handle()
}

fn spawn_summary(summarizer: Arc<Summarizer>, request: SummaryRequest, tx: mpsc::Sender<Action>) {
    info!(
        "Refreshing summary ({} bytes of new exchanges)",
        request.new_information.len()
    );
    tokio::spawn(async move {
        let action = match summarizer
            .refresh(&request.existing, &request.new_information)
            .await
        {
            Ok(summary) => Action::SummaryReady(summary),
            Err(error) => Action::SummaryFailed(error),
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver summary result: receiver dropped");
        }
    });
}
