//! # TitleBar Component
//!
//! Top status bar: model name, transient status and the active theme.
//!
//! Stateless; every field is a prop copied from `App` when the frame is drawn.
//! The status part is dropped when empty:
//!
//! 1. `"gemchat (model: gemini-pro) | Typing... | Dark"`
//! 2. `"gemchat (model: gemini-pro) | Dark"`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub struct TitleBar<'a> {
    pub model_name: &'a str,
    pub status_message: &'a str,
    pub theme_label: &'a str,
    pub palette: Palette,
}

impl<'a> TitleBar<'a> {
    pub fn new(
        model_name: &'a str,
        status_message: &'a str,
        theme_label: &'a str,
        palette: Palette,
    ) -> Self {
        Self {
            model_name,
            status_message,
            theme_label,
            palette,
        }
    }

    fn title_text(&self) -> String {
        if self.status_message.is_empty() {
            format!("gemchat (model: {}) | {}", self.model_name, self.theme_label)
        } else {
            format!(
                "gemchat (model: {}) | {} | {}",
                self.model_name, self.status_message, self.theme_label
            )
        }
    }
}

impl<'a> Component for TitleBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::styled(self.title_text(), self.palette.base()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(status: &str) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                TitleBar::new("gemini-pro", status, "Dark", Palette::for_theme(Theme::Dark))
                    .render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let text = render("Typing...");
        assert!(text.contains("gemchat (model: gemini-pro)"));
        assert!(text.contains("| Typing... | Dark"));
    }

    #[test]
    fn test_title_bar_without_status() {
        let text = render("");
        assert!(text.contains("gemchat (model: gemini-pro) | Dark"));
        assert_eq!(text.matches('|').count(), 1);
    }
}
