use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{InputBox, MessageList, SummaryLine, TitleBar};

/// Projects the whole application state onto one frame.
///
/// Layout: 1-line header, the summary row once a summary exists, the conversation,
/// then the input box sized to its text.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let mut input_box = InputBox::new(app.input.as_str(), app.busy);
    let input_height = input_box.calculate_height(frame.area().width);

    let mut summary_line = SummaryLine::new(app.summary.text(), app.summary.is_refreshing());

    let layout = Layout::vertical([
        Length(1),
        Length(summary_line.height()),
        Min(0),
        Length(input_height),
    ]);
    let [title_area, summary_area, main_area, input_area] = layout.areas(frame.area());

    let pending = app.busy.then(|| app.stream.text());
    MessageList::new(&mut tui.message_list, app.log.messages(), pending).render(frame, main_area);

    // Header last so it reflects the unseen-content flag computed by the list
    let mut title_bar = TitleBar {
        provider_name: app.provider_name.clone(),
        model_name: app.model_name.clone(),
        status_message: app.status_message.clone(),
        busy: app.busy,
        failed: app.error.is_some(),
        spinner_frame,
        has_unseen_content: tui.message_list.has_unseen_content,
    };
    title_bar.render(frame, title_area);
    summary_line.render(frame, summary_area);

    input_box.render(frame, input_area);
}
