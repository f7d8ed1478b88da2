use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::conversation::Role;
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// A stateless component that renders one chat message with role-based styling.
///
/// # Design
///
/// `MessageBlock` is a **transient component**: it's created fresh each frame with the
/// data it needs to render. The in-progress answer is rendered through the same
/// component with `streaming` set, which brightens its border.
///
/// # Styling
///
/// - **User** (green): Messages typed at the prompt
/// - **Assistant** (blue): Responses from the model
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) predicts rendered height using
/// `textwrap` with options that match Ratatui's `Paragraph` wrapping behavior, so
/// the parent `MessageList` can size its scroll canvas without rendering.
#[derive(Clone, Copy)]
pub struct MessageBlock<'a> {
    pub role: Role,
    pub content: &'a str,
    /// True for the answer that is still being streamed
    pub streaming: bool,
}

impl<'a> MessageBlock<'a> {
    pub fn new(role: Role, content: &'a str, streaming: bool) -> Self {
        Self {
            role,
            content,
            streaming,
        }
    }

    /// Calculate the height required for `content` given a width.
    ///
    /// The wrapping options must match the Ratatui default for `Paragraph`
    /// to ensure 1:1 mapping between calculated and actual height.
    pub fn calculate_height(content: &str, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding.
            return 1;
        }

        let content = content.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }
}

pub fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Green),
        Role::Assistant => Style::default().fg(Color::Blue),
    }
}

impl<'a> Widget for MessageBlock<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = role_style(self.role);
        let border_style = if self.streaming {
            style.add_modifier(Modifier::BOLD)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let block = Block::bordered()
            .title(self.role.label())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.content.trim())
            .style(style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

impl<'a> Component for MessageBlock<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn calculate_height_empty_content_returns_border_height() {
        assert_eq!(MessageBlock::calculate_height("", 80), VERTICAL_OVERHEAD);
        assert_eq!(MessageBlock::calculate_height("   \n\t  ", 80), VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        assert_eq!(MessageBlock::calculate_height("Hello world", 0), 1);
        assert_eq!(
            MessageBlock::calculate_height("Hello world", HORIZONTAL_OVERHEAD),
            1
        );
    }

    #[test]
    fn calculate_height_single_line_fits() {
        assert_eq!(
            MessageBlock::calculate_height("Hello", 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        // content_width = 9 - 4 = 5: "Hello" | "world"
        assert_eq!(
            MessageBlock::calculate_height("Hello world", 9),
            2 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_breaks_long_words() {
        // content_width = 4: "abcd" | "efgh" | "ij"
        assert_eq!(
            MessageBlock::calculate_height("abcdefghij", 8),
            3 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn roles_have_distinct_colours() {
        assert_eq!(role_style(Role::User).fg, Some(Color::Green));
        assert_eq!(role_style(Role::Assistant).fg, Some(Color::Blue));
    }

    #[test]
    fn renders_role_label_and_content() {
        let backend = TestBackend::new(30, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let mut block = MessageBlock::new(Role::Assistant, "Hi there!", false);
                let area = f.area();
                Component::render(&mut block, f, area);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("assistant"));
        assert!(text.contains("Hi there!"));
    }
}
