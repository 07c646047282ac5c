//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `Transcript` (props).
//! The list sticks to the bottom, so every new message or revealed word
//! brings the newest entry into view, until the user scrolls up. Scrolling
//! back down to the end re-pins it.
//!
//! The scroll view is addressed in `u16` rows. When the whole history is
//! taller than that, only the newest messages that fit are laid out.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::Transcript;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageView;
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

/// Rows moved per scroll-wheel notch or arrow key.
const SCROLL_STEP: u16 = 1;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    /// Cached height of each message from the last render
    pub heights: Vec<u16>,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Message selected in cursor mode
    pub selected_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Index of the oldest message laid out in the scroll view
    pub first_index: usize,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            heights: Vec::new(),
            stick_to_bottom: true,
            selected_index: None,
            viewport_height: 0,
            first_index: 0,
        }
    }

    fn total_height(&self) -> u16 {
        sum_heights(&self.heights[self.first_index.min(self.heights.len())..])
    }

    fn max_offset(&self) -> u16 {
        self.total_height().saturating_sub(self.viewport_height)
    }

    fn set_offset_y(&mut self, y: u16) {
        let y = y.min(self.max_offset());
        self.scroll_state.set_offset(Position { x: 0, y });
    }

    pub fn scroll_up(&mut self, rows: u16) {
        let y = self.scroll_state.offset().y.saturating_sub(rows);
        self.set_offset_y(y);
        self.stick_to_bottom = false;
    }

    /// Scroll down, re-pinning to the bottom once the end is reached.
    pub fn scroll_down(&mut self, rows: u16) {
        let y = self.scroll_state.offset().y.saturating_add(rows);
        self.set_offset_y(y);
        if self.scroll_state.offset().y >= self.max_offset() {
            self.stick_to_bottom = true;
        }
    }

    /// Move the selection by `delta` messages, clamped to `len`.
    pub fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected_index = None;
            return;
        }
        let current = self.selected_index.unwrap_or(len - 1) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.selected_index = Some(next);
        self.scroll_to_selected();
    }

    /// Scroll the viewport so the selected message is fully visible.
    /// If the message is taller than the viewport, align its top edge.
    pub fn scroll_to_selected(&mut self) {
        let Some(idx) = self.selected_index else {
            return;
        };
        if idx >= self.heights.len() {
            return;
        }
        if idx < self.first_index {
            self.set_offset_y(0);
            self.stick_to_bottom = false;
            return;
        }

        let item_top = sum_heights(&self.heights[self.first_index..idx]);
        let item_bottom = item_top.saturating_add(self.heights[idx]);
        let offset_y = self.scroll_state.offset().y;

        if item_top < offset_y {
            self.set_offset_y(item_top);
            self.stick_to_bottom = false;
        } else if item_bottom > offset_y.saturating_add(self.viewport_height) {
            let new_y = item_bottom.saturating_sub(self.viewport_height);
            self.set_offset_y(new_y);
            self.stick_to_bottom = new_y >= self.max_offset();
        }
    }

    /// Back to the initial state (used after delete-all).
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn sum_heights(heights: &[u16]) -> u16 {
    heights.iter().fold(0u16, |acc, h| acc.saturating_add(*h))
}

/// Index of the oldest message such that it and everything after it fit in
/// `u16::MAX` rows. Always keeps at least the newest message.
fn window_start(heights: &[u16]) -> usize {
    let mut total: u32 = 0;
    for (index, height) in heights.iter().enumerate().rev() {
        total += u32::from(*height);
        if total > u32::from(u16::MAX) {
            return (index + 1).min(heights.len() - 1);
        }
    }
    0
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let page = self.viewport_height.saturating_sub(1).max(1);
        match event {
            TuiEvent::ScrollUp => self.scroll_up(SCROLL_STEP),
            TuiEvent::ScrollDown => self.scroll_down(SCROLL_STEP),
            TuiEvent::ScrollPageUp => self.scroll_up(page),
            TuiEvent::ScrollPageDown => self.scroll_down(page),
            _ => return None,
        }
        Some(())
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
    pub palette: Palette,
    pub copied_index: Option<usize>,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        transcript: &'a Transcript,
        palette: Palette,
        copied_index: Option<usize>,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            transcript,
            palette,
            copied_index,
            spinner_frame,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar

        // 1. Update layout cache
        self.state.heights = self
            .transcript
            .iter()
            .map(|message| MessageView::calculate_height(message, content_width))
            .collect();
        self.state.first_index = window_start(&self.state.heights);
        self.state.viewport_height = area.height;

        // 2. Keep the newest entry in view unless the user scrolled away
        if self.state.stick_to_bottom {
            let bottom = self.state.max_offset();
            self.state.set_offset_y(bottom);
        } else {
            let y = self.state.scroll_state.offset().y;
            self.state.set_offset_y(y);
        }

        // 3. Render every message into the scroll view
        let total_height = self.state.total_height();
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for (index, message) in self
            .transcript
            .iter()
            .enumerate()
            .skip(self.state.first_index)
        {
            let height = self.state.heights[index].min(total_height.saturating_sub(y_offset));
            let view = MessageView::new(
                message,
                self.palette,
                self.state.selected_index == Some(index),
                self.copied_index == Some(index),
                self.spinner_frame,
            );
            scroll_view.render_widget(view, Rect::new(0, y_offset, content_width, height));
            y_offset = y_offset.saturating_add(height);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
