use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::core::transcript::{Message, Role, Status};
use crate::tui::component::Component;
use crate::tui::theme::Palette;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Frames of the loading indicator shown while a reply has no text yet.
const LOADING_FRAMES: [&str; 4] = ["▰▱▱", "▰▰▱", "▰▰▰", "▱▰▰"];

/// A stateless component that renders a single chat message.
///
/// `Message` is created fresh each frame by `MessageList` with everything it
/// needs. Selection and the "copied" marker are tracked by the parent and
/// passed in as props.
///
/// Pending replies without text show an animated loading indicator in place
/// of the body. The copy hint in the bottom border is hidden until the
/// message is settled (complete or errored).
#[derive(Clone, Copy)]
pub struct MessageView<'a> {
    pub message: &'a Message,
    pub palette: Palette,
    pub is_selected: bool,
    pub copied: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageView<'a> {
    pub fn new(
        message: &'a Message,
        palette: Palette,
        is_selected: bool,
        copied: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            message,
            palette,
            is_selected,
            copied,
            spinner_frame,
        }
    }

    /// Calculate the height required for this message given a width.
    ///
    /// Uses `textwrap` with options matching Ratatui's `Paragraph` wrapping so
    /// the list can size its scroll view without rendering first.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding.
            return 1;
        }

        let content = message.text.trim();
        if content.is_empty() {
            // One body line for the loading indicator or the empty reply
            return 1 + VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        u16::try_from(lines.len())
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }

    fn role_label(&self) -> &'static str {
        match self.message.role {
            Role::User => "you",
            Role::Assistant => "gemini",
        }
    }

    fn is_loading(&self) -> bool {
        self.message.status == Status::Pending && self.message.text.is_empty()
    }

    fn copy_hint(&self) -> Option<&'static str> {
        match self.message.status {
            Status::Pending => None,
            _ if self.copied => Some(" ✓ copied "),
            _ if self.is_selected => Some(" c: copy "),
            _ => None,
        }
    }
}

impl<'a> Widget for MessageView<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = self
            .palette
            .message_style(self.message.role, self.message.status);

        let border_style = if self.is_selected {
            Style::default().fg(self.palette.accent)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let mut block = Block::bordered()
            .title(self.role_label())
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        if let Some(hint) = self.copy_hint() {
            block = block.title_bottom(Line::from(hint).right_aligned());
        }

        let inner_area = block.inner(area);
        block.render(area, buf);

        let paragraph = if self.is_loading() {
            let frame = LOADING_FRAMES[self.spinner_frame % LOADING_FRAMES.len()];
            Paragraph::new(frame).style(style.add_modifier(Modifier::DIM))
        } else {
            Paragraph::new(self.message.text.trim())
                .style(style)
                .wrap(Wrap { trim: true })
        };

        paragraph.render(inner_area, buf);
    }
}

impl<'a> Component for MessageView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_to_text(message: &Message, is_selected: bool, copied: bool) -> String {
        let backend = TestBackend::new(40, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let palette = Palette::for_theme(Theme::Dark);
        terminal
            .draw(|f| {
                let mut view = MessageView::new(message, palette, is_selected, copied, 0);
                Component::render(&mut view, f, f.area());
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

    // ==========================================================================
    // calculate_height tests
    // ==========================================================================

    #[test]
    fn calculate_height_empty_content_reserves_indicator_line() {
        let message = Message::pending_reply();
        assert_eq!(MessageView::calculate_height(&message, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        let message = Message::user("Hello world");
        assert_eq!(MessageView::calculate_height(&message, 0), 1);
        assert_eq!(
            MessageView::calculate_height(&message, HORIZONTAL_OVERHEAD),
            1
        );
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        let message = Message::user("Hello world");
        // width 9 → content_width = 5: "Hello" | "world"
        assert_eq!(
            MessageView::calculate_height(&message, 9),
            2 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_breaks_long_words() {
        let message = Message::user("abcdefghij");
        // width 8 → content_width = 4: "abcd" | "efgh" | "ij"
        assert_eq!(
            MessageView::calculate_height(&message, 8),
            3 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_saturates_for_huge_replies() {
        let message = Message::user("x\n".repeat(70_000));
        assert_eq!(MessageView::calculate_height(&message, 40), u16::MAX);
    }

    // ==========================================================================
    // Rendering
    // ==========================================================================

    #[test]
    fn render_shows_role_and_text() {
        let text = render_to_text(&Message::user("Hello"), false, false);
        assert!(text.contains("you"));
        assert!(text.contains("Hello"));
    }

    #[test]
    fn render_pending_shows_loading_indicator_without_copy_hint() {
        let text = render_to_text(&Message::pending_reply(), true, false);
        assert!(text.contains("gemini"));
        assert!(text.contains(LOADING_FRAMES[0]));
        assert!(!text.contains("copy"));
    }

    #[test]
    fn render_selected_settled_message_shows_copy_hint() {
        let text = render_to_text(&Message::user("Hello"), true, false);
        assert!(text.contains("c: copy"));
    }

    #[test]
    fn render_copied_marker() {
        let text = render_to_text(&Message::user("Hello"), true, true);
        assert!(text.contains("copied"));
    }
}
