//! # Landing Page Component
//!
//! Greeting header with suggested prompts, shown while the transcript is
//! empty. Tab / Shift+Tab move the highlight; Enter on an empty input box
//! sends the highlighted suggestion.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub struct LandingPage<'a> {
    pub suggestions: &'a [String],
    pub selected: Option<usize>,
    pub palette: Palette,
}

impl<'a> LandingPage<'a> {
    pub fn new(suggestions: &'a [String], selected: Option<usize>, palette: Palette) -> Self {
        Self {
            suggestions,
            selected,
            palette,
        }
    }

    fn header_lines(&self) -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled(
                "Hello there",
                Style::default()
                    .fg(self.palette.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "How can I help you today?",
                Style::default().fg(self.palette.muted),
            )),
        ]
    }

    fn suggestion_lines(&self) -> Vec<Line<'a>> {
        self.suggestions
            .iter()
            .enumerate()
            .map(|(i, text)| {
                if self.selected == Some(i) {
                    Line::from(Span::styled(
                        format!("▸ {text}"),
                        Style::default()
                            .fg(self.palette.accent)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::styled(
                        format!("  {text}"),
                        Style::default().fg(self.palette.text),
                    ))
                }
            })
            .collect()
    }
}

impl<'a> Component for LandingPage<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let header = self.header_lines();
        let suggestions = self.suggestion_lines();
        let hint = Line::from(Span::styled(
            "Tab: pick a suggestion · Ctrl+T: theme · Ctrl+D: delete chats",
            self.palette.hint(),
        ));

        let [header_area, _, suggestions_area, _, hint_area] = Layout::vertical([
            Constraint::Length(header.len() as u16),
            Constraint::Length(1),
            Constraint::Length(suggestions.len() as u16),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(area);

        frame.render_widget(
            Paragraph::new(header).alignment(Alignment::Center),
            header_area,
        );
        frame.render_widget(
            Paragraph::new(suggestions).alignment(Alignment::Center),
            suggestions_area,
        );
        frame.render_widget(Paragraph::new(hint).alignment(Alignment::Center), hint_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(suggestions: &[String], selected: Option<usize>) -> String {
        let backend = TestBackend::new(80, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                LandingPage::new(suggestions, selected, Palette::for_theme(Theme::Light))
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
    fn test_renders_greeting_and_suggestions() {
        let suggestions = vec!["Plan a trip".to_string(), "Write a poem".to_string()];
        let text = render(&suggestions, None);
        assert!(text.contains("Hello there"));
        assert!(text.contains("Plan a trip"));
        assert!(text.contains("Write a poem"));
        assert!(!text.contains('▸'));
    }

    #[test]
    fn test_marks_selected_suggestion() {
        let suggestions = vec!["Plan a trip".to_string(), "Write a poem".to_string()];
        let text = render(&suggestions, Some(1));
        assert!(text.contains("▸ Write a poem"));
    }
}
