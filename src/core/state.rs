//! # Application State
//!
//! Core business state for gemchat. Domain logic only; presentation state
//! (scroll offsets, input buffer, dialogs) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── provider: Arc<dyn CompletionProvider>  // remote completion client
//! ├── transcript: Transcript         // ordered chat history
//! ├── busy: bool                     // a completion is in flight
//! ├── pending_prompt: Option<String> // prompt waiting for its request
//! ├── pending_reply: Option<Handle>  // assistant message awaiting text
//! ├── reveal: Option<Reveal>         // reply currently being revealed
//! ├── theme: Theme                   // light / dark
//! ├── header_visible: bool           // landing header shown
//! ├── status_message: String         // status bar text
//! └── model_name: String             // current model
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use log::warn;

use crate::core::config::ResolvedConfig;
use crate::core::reveal::Reveal;
use crate::core::transcript::{MessageHandle, Transcript};
use crate::inference::CompletionProvider;

/// Colour scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Value written to the store.
    pub fn storage_value(self) -> &'static str {
        match self {
            Theme::Light => "light_mode",
            Theme::Dark => "dark_mode",
        }
    }

    pub fn from_storage_value(value: Option<&str>) -> Theme {
        match value {
            Some("light_mode") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }
}

pub struct App {
    pub provider: Arc<dyn CompletionProvider>,
    pub transcript: Transcript,
    /// The session flag: true from a valid submit until the turn settles.
    pub busy: bool,
    /// Prompt of the current turn, consumed by `BeginCompletion`.
    pub pending_prompt: Option<String>,
    /// Assistant message waiting for the service to answer.
    pub pending_reply: Option<MessageHandle>,
    pub reveal: Option<Reveal>,
    pub theme: Theme,
    pub header_visible: bool,
    pub status_message: String,
    pub model_name: String,
    pub suggestions: Vec<String>,
}

impl App {
    pub fn new(provider: Arc<dyn CompletionProvider>, model_name: String) -> Self {
        Self {
            provider,
            transcript: Transcript::new(),
            busy: false,
            pending_prompt: None,
            pending_reply: None,
            reveal: None,
            theme: Theme::default(),
            header_visible: true,
            status_message: String::from("Welcome to gemchat!"),
            model_name,
            suggestions: Vec::new(),
        }
    }

    pub fn from_config(provider: Arc<dyn CompletionProvider>, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(provider, config.model_name.clone());
        app.suggestions = config.suggestions.clone();
        app
    }

    /// Restores the transcript and theme read from the store at startup.
    ///
    /// A snapshot that fails to parse is logged and dropped, leaving an
    /// empty transcript.
    pub fn restore(&mut self, snapshot: Option<&str>, theme: Theme) {
        self.theme = theme;
        self.transcript = match snapshot.map(Transcript::from_snapshot) {
            Some(Ok(transcript)) => transcript,
            Some(Err(e)) => {
                warn!("Discarding unreadable saved transcript: {}", e);
                Transcript::new()
            }
            None => Transcript::new(),
        };
        self.header_visible = self.transcript.is_empty();
    }

    /// True while a reply is streaming in word by word.
    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }
}
