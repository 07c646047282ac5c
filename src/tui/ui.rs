use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::widgets::Block;

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{ConfirmView, LandingPage, MessageList, TitleBar};
use crate::tui::theme::Palette;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let palette = Palette::for_theme(app.theme);
    frame.render_widget(Block::default().style(palette.base()), frame.area());

    tui.input_box.palette = palette;
    let input_height = tui.input_box.calculate_height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    TitleBar::new(
        &app.model_name,
        &app.status_message,
        app.theme.label(),
        palette,
    )
    .render(frame, title_area);

    if app.header_visible && app.transcript.is_empty() {
        LandingPage::new(&app.suggestions, tui.suggestion_index, palette).render(frame, main_area);
    } else {
        MessageList::new(
            &mut tui.message_list,
            &app.transcript,
            palette,
            tui.copied.active(Instant::now()),
            spinner_frame,
        )
        .render(frame, main_area);
    }

    tui.input_box.render(frame, input_area);

    if tui.confirm.is_some() {
        ConfirmView { palette }.render(frame, frame.area());
    }
}
