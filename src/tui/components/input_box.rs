//! # InputBox Component
//!
//! Renders the pending input behind a `> ` prompt marker.
//!
//! The buffer itself lives in core (`App::input`) so that submit rules are enforced
//! in one place. This component only projects it: the box grows with the text up to
//! [`MAX_VISIBLE_LINES`], then shows the tail so the cursor line stays visible.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;

pub const PROMPT: &str = "> ";
/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before the box starts showing only the tail
pub const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border + padding)
const CONTENT_OFFSET_X: u16 = 2;

/// Input box props.
pub struct InputBox<'a> {
    pub text: &'a str,
    /// A turn is in flight; Enter is ignored until it ends
    pub busy: bool,
}

impl<'a> InputBox<'a> {
    pub fn new(text: &'a str, busy: bool) -> Self {
        Self { text, busy }
    }

    /// Height for the current text, clamped to the visible-line limit.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let lines = wrapped_lines(self.text, inner_width(width)).len() as u16;
        lines.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn title(&self) -> &'static str {
        if self.busy { "Input (waiting for reply)" } else { "Input" }
    }
}

fn inner_width(width: u16) -> u16 {
    width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wraps prompt + text into display lines. A trailing newline yields an empty last
/// line so the cursor lands below it.
fn wrapped_lines(text: &str, width: u16) -> Vec<String> {
    let full = format!("{PROMPT}{text}");
    if width == 0 {
        return vec![full];
    }
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    let mut lines: Vec<String> = textwrap::wrap(&full, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect();
    if full.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        lines.push(String::new());
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Cursor column within the last visible line. Trailing spaces dropped by wrapping
/// still move the cursor.
fn cursor_column(text: &str, last_line: &str, width: u16) -> u16 {
    let full = format!("{PROMPT}{text}");
    let trailing_spaces = if last_line.ends_with(' ') || full.ends_with('\n') {
        0
    } else {
        full.len() - full.trim_end_matches(' ').len()
    };
    let column = last_line.width() + trailing_spaces;
    (column as u16).min(width.saturating_sub(1))
}

impl<'a> Component for InputBox<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        let lines = wrapped_lines(self.text, width);
        let visible = (area.height.saturating_sub(VERTICAL_OVERHEAD) as usize).max(1);
        let start = lines.len().saturating_sub(visible);
        let tail = &lines[start..];

        let border_style = if self.busy {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title())
            .padding(Padding::horizontal(1));

        let paragraph = Paragraph::new(tail.join("\n"))
            .block(block)
            .style(Style::default().fg(Color::Green).add_modifier(if self.busy {
                Modifier::DIM
            } else {
                Modifier::empty()
            }));
        frame.render_widget(paragraph, area);

        let last_line = tail.last().map(String::as_str).unwrap_or_default();
        let cursor_x = area.x + CONTENT_OFFSET_X + cursor_column(self.text, last_line, width);
        let cursor_y = area.y + 1 + (tail.len() as u16).saturating_sub(1);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}
