//! # TitleBar Component
//!
//! Top status bar showing which backend is in use and what the current turn is doing.
//!
//! ## Responsibilities
//!
//! - Display `parley · <provider>/<model> · <status>`
//! - Prefix the status with a spinner frame while a turn is in flight
//! - Show "↓ New" when there's unseen content below the scroll position
//! - Render the status in red when the last turn failed
//!
//! ## Stateless Component
//!
//! TitleBar is purely presentational. It receives all data as props and has no
//! internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar {
//!     provider_name: "ollama".to_string(),
//!     model_name: "llama3.2".to_string(),
//!     status_message: "Streaming...".to_string(),
//!     busy: true,
//!     failed: false,
//!     spinner_frame: 3,
//!     has_unseen_content: false,
//! };
//! title_bar.render(frame, area);
//! ```

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Braille spinner frames, advanced by the event loop's animation clock.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const SEPARATOR: &str = " · ";

/// Top status bar component.
pub struct TitleBar {
    pub provider_name: String,
    pub model_name: String,
    pub status_message: String,
    /// A turn is in flight; show the spinner
    pub busy: bool,
    /// The last turn failed; highlight the status
    pub failed: bool,
    pub spinner_frame: usize,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    fn status_style(&self) -> Style {
        if self.failed {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else if self.busy {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn line(&self) -> Line<'_> {
        let mut spans = vec![
            Span::styled("parley", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(SEPARATOR),
            Span::styled(
                format!("{}/{}", self.provider_name, self.model_name),
                Style::default().fg(Color::Cyan),
            ),
        ];

        if !self.status_message.is_empty() {
            spans.push(Span::raw(SEPARATOR));
            if self.busy {
                let frame = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
                spans.push(Span::styled(format!("{frame} "), self.status_style()));
            }
            spans.push(Span::styled(self.status_message.as_str(), self.status_style()));
        }

        if self.has_unseen_content {
            spans.push(Span::raw(SEPARATOR));
            spans.push(Span::styled("↓ New", Style::default().fg(Color::Green)));
        }

        Line::from(spans)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}
