//! # SummaryLine Component
//!
//! One dimmed row under the title bar carrying the rolling conversation summary.
//! Hidden (zero height) until the first summary arrives. Text wider than the
//! terminal is clipped.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const LABEL: &str = "Summary: ";

pub struct SummaryLine<'a> {
    pub summary: &'a str,
    /// A refresh is in flight
    pub refreshing: bool,
}

impl<'a> SummaryLine<'a> {
    pub fn new(summary: &'a str, refreshing: bool) -> Self {
        Self {
            summary,
            refreshing,
        }
    }

    pub fn height(&self) -> u16 {
        if self.summary.trim().is_empty() { 0 } else { 1 }
    }

    fn line(&self) -> Line<'a> {
        let dim = Style::default().fg(Color::DarkGray);
        // Multi-line summaries are folded into the single row
        let text = self.summary.split_whitespace().collect::<Vec<_>>().join(" ");
        let mut spans = vec![
            Span::styled(LABEL, dim.add_modifier(Modifier::BOLD)),
            Span::styled(text, dim.add_modifier(Modifier::ITALIC)),
        ];
        if self.refreshing {
            spans.push(Span::styled(" (updating)", dim));
        }
        Line::from(spans)
    }
}

impl<'a> Component for SummaryLine<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.height == 0 || self.height() == 0 {
            return;
        }
        frame.render_widget(self.line(), area);
    }
}
