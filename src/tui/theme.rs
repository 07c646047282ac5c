//! Colour palettes for the light and dark themes.

use ratatui::style::{Color, Modifier, Style};

use crate::core::state::Theme;
use crate::core::transcript::{Role, Status};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub user: Color,
    pub assistant: Color,
    pub error: Color,
    pub accent: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::Reset,
                text: Color::White,
                muted: Color::DarkGray,
                user: Color::Green,
                assistant: Color::Blue,
                error: Color::LightRed,
                accent: Color::Cyan,
            },
            Theme::Light => Self {
                background: Color::Rgb(245, 245, 245),
                text: Color::Black,
                muted: Color::Gray,
                user: Color::Rgb(0, 110, 60),
                assistant: Color::Rgb(30, 70, 170),
                error: Color::Red,
                accent: Color::Rgb(120, 40, 160),
            },
        }
    }

    /// Base style for the whole frame.
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Text style for a message body.
    pub fn message_style(&self, role: Role, status: Status) -> Style {
        match (role, status) {
            (_, Status::Error) => Style::default().fg(self.error),
            (Role::User, _) => Style::default().fg(self.user),
            (Role::Assistant, _) => Style::default().fg(self.assistant),
        }
    }

    pub fn hint(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::ITALIC)
    }
}
