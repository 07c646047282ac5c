//! # Confirm Dialog
//!
//! Centered overlay asking whether to delete all chats. `y` or Enter
//! confirms; `n` or Esc dismisses. Every other key is swallowed while the
//! dialog is open.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

const DIALOG_WIDTH: u16 = 44;
const DIALOG_HEIGHT: u16 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmEvent {
    Confirmed,
    Dismissed,
}

#[derive(Debug, Default)]
pub struct ConfirmDialog;

impl ConfirmDialog {
    pub fn new() -> Self {
        Self
    }

    /// Centered rect for the dialog, shrunk to fit small terminals.
    fn dialog_area(area: Rect) -> Rect {
        let [row] = Layout::vertical([Constraint::Length(DIALOG_HEIGHT.min(area.height))])
            .flex(Flex::Center)
            .areas(area);
        let [dialog] = Layout::horizontal([Constraint::Length(DIALOG_WIDTH.min(area.width))])
            .flex(Flex::Center)
            .areas(row);
        dialog
    }
}

impl EventHandler for ConfirmDialog {
    type Event = ConfirmEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Submit | TuiEvent::InputChar('y') | TuiEvent::InputChar('Y') => {
                Some(ConfirmEvent::Confirmed)
            }
            TuiEvent::Escape | TuiEvent::InputChar('n') | TuiEvent::InputChar('N') => {
                Some(ConfirmEvent::Dismissed)
            }
            _ => None,
        }
    }
}

/// Renders the dialog with the given palette.
pub struct ConfirmView {
    pub palette: Palette,
}

impl Component for ConfirmView {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dialog = ConfirmDialog::dialog_area(area);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.palette.error))
            .title("Delete all chats")
            .style(self.palette.base());

        let body = vec![
            Line::from("This removes every message."),
            Line::from(""),
            Line::styled(
                "y / Enter: delete   n / Esc: keep",
                self.palette.hint().remove_modifier(Modifier::ITALIC),
            ),
        ];

        frame.render_widget(Clear, dialog);
        frame.render_widget(
            Paragraph::new(body)
                .alignment(Alignment::Center)
                .block(block),
            dialog,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_confirm_keys() {
        let mut dialog = ConfirmDialog::new();
        assert_eq!(
            dialog.handle_event(&TuiEvent::InputChar('y')),
            Some(ConfirmEvent::Confirmed)
        );
        assert_eq!(
            dialog.handle_event(&TuiEvent::Submit),
            Some(ConfirmEvent::Confirmed)
        );
    }

    #[test]
    fn test_dismiss_keys() {
        let mut dialog = ConfirmDialog::new();
        assert_eq!(
            dialog.handle_event(&TuiEvent::Escape),
            Some(ConfirmEvent::Dismissed)
        );
        assert_eq!(
            dialog.handle_event(&TuiEvent::InputChar('n')),
            Some(ConfirmEvent::Dismissed)
        );
        assert_eq!(dialog.handle_event(&TuiEvent::InputChar('x')), None);
    }

    #[test]
    fn test_render_centered_prompt() {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                ConfirmView {
                    palette: Palette::for_theme(Theme::Dark),
                }
                .render(f, f.area());
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Delete all chats"));
        assert!(text.contains("removes every message"));
    }
}
