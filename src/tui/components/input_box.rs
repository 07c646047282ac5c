//! # InputBox Component
//!
//! Multi-line prompt editor at the bottom of the screen.
//!
//! The buffer and cursor are internal state. `busy` is a prop from the
//! application state: while a turn is in flight the box stays editable but
//! its title tells the user that Enter will wait.
//!
//! Text is hard-wrapped into visual rows of the inner width, measured in
//! terminal cells so wide characters count twice. The cursor maps onto the
//! screen exactly, and the box grows up to
//! `MAX_VISIBLE_LINES` rows before scrolling internally.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border + padding)
const CONTENT_OFFSET_X: u16 = 2;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
}

/// A visual row as a byte range into the buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Row {
    start: usize,
    end: usize,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pos: usize,
    /// First visible row when the content is taller than the box
    scroll_offset: u16,
    /// Inner width from the last render, used for vertical movement
    last_inner_width: u16,
    /// A turn is in flight (Prop)
    pub busy: bool,
    /// Dimmed while the message list has focus (Prop)
    pub dimmed: bool,
    pub palette: Palette,
}

impl InputBox {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new(palette: Palette) -> Self {
        Self {
            buffer: String::new(),
            pos: 0,
            scroll_offset: 0,
            last_inner_width: Self::DEFAULT_WIDTH - HORIZONTAL_OVERHEAD,
            busy: false,
            dimmed: false,
            palette,
        }
    }

    /// Replace the buffer, e.g. with a picked suggestion. Cursor goes to the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.pos = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Height needed for the current buffer at `width`, clamped to
    /// [1 + VERTICAL_OVERHEAD, MAX_VISIBLE_LINES + VERTICAL_OVERHEAD].
    pub fn calculate_height(&self, width: u16) -> u16 {
        let rows = visual_rows(&self.buffer, width.saturating_sub(HORIZONTAL_OVERHEAD));
        (rows.len() as u16).clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// Row index and display column of the cursor.
    fn cursor_row_col(&self, rows: &[Row]) -> (usize, usize) {
        let row_idx = rows
            .iter()
            .rposition(|row| row.start <= self.pos && self.pos <= row.end)
            .unwrap_or(0);
        let col = rows
            .get(row_idx)
            .map(|row| display_width(&self.buffer[row.start..self.pos]))
            .unwrap_or(0);
        (row_idx, col)
    }

    fn move_vertically(&mut self, direction: isize) -> bool {
        let rows = visual_rows(&self.buffer, self.last_inner_width);
        let (row_idx, col) = self.cursor_row_col(&rows);
        let target = row_idx as isize + direction;
        if target < 0 || target as usize >= rows.len() {
            return false;
        }

        let row = rows[target as usize];
        let mut x = 0;
        self.pos = row.end;
        for (i, c) in self.buffer[row.start..row.end].char_indices() {
            let w = char_width(c);
            if x + w > col {
                self.pos = row.start + i;
                break;
            }
            x += w;
        }
        true
    }

    fn update_scroll_offset(&mut self, cursor_row: usize) {
        let cursor_row = cursor_row as u16;
        if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = cursor_row + 1 - MAX_VISIBLE_LINES;
        }
    }

    fn title(&self) -> &'static str {
        if self.busy {
            "Message (waiting for reply)"
        } else {
            "Message"
        }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        self.last_inner_width = inner_width;

        let rows = visual_rows(&self.buffer, inner_width);
        let (cursor_row, cursor_col) = self.cursor_row_col(&rows);
        self.update_scroll_offset(cursor_row);

        let visible: Vec<Line> = rows
            .iter()
            .skip(self.scroll_offset as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .map(|row| Line::raw(&self.buffer[row.start..row.end]))
            .collect();

        let mut style = Style::default().fg(self.palette.user);
        if self.dimmed {
            style = style.add_modifier(Modifier::DIM);
        }

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .padding(Padding::horizontal(1))
            .title(self.title());

        frame.render_widget(Paragraph::new(visible).block(block).style(style), area);

        if !self.dimmed {
            let max_x = area.x + area.width.saturating_sub(CONTENT_OFFSET_X + 1);
            let x = (area.x + CONTENT_OFFSET_X + cursor_col as u16).min(max_x);
            let y = area.y + 1 + (cursor_row as u16).saturating_sub(self.scroll_offset);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.pos, *c);
                self.pos += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                let text = text.replace("\r\n", "\n");
                self.buffer.insert_str(self.pos, &text);
                self.pos += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.pos > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.pos);
                self.buffer.drain(prev..self.pos);
                self.pos = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.pos < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.pos);
                self.buffer.drain(self.pos..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.pos > 0).then(|| {
                self.pos = prev_char_boundary(&self.buffer, self.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.pos < self.buffer.len()).then(|| {
                self.pos = next_char_boundary(&self.buffer, self.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.pos != line_start).then(|| {
                    self.pos = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.pos..]
                    .find('\n')
                    .map(|i| self.pos + i)
                    .unwrap_or(self.buffer.len());
                (self.pos != line_end).then(|| {
                    self.pos = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorUp => self
                .move_vertically(-1)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::CursorDown => self
                .move_vertically(1)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::Submit => {
                // Whitespace-only input is left in place; the controller
                // would ignore it anyway.
                if self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.clear();
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Split `text` into visual rows: one per logical line, each hard-wrapped
/// before it would exceed `width` cells. Always returns at least one row.
fn visual_rows(text: &str, width: u16) -> Vec<Row> {
    let width = width.max(1) as usize;
    let mut rows = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let mut row_start = line_start;
        let mut row_width = 0;
        for (i, c) in line.char_indices() {
            let w = char_width(c);
            if row_width > 0 && row_width + w > width {
                rows.push(Row {
                    start: row_start,
                    end: line_start + i,
                });
                row_start = line_start + i;
                row_width = 0;
            }
            row_width += w;
        }
        rows.push(Row {
            start: row_start,
            end: line_start + line.len(),
        });
        line_start += line.len() + 1;
    }

    rows
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
