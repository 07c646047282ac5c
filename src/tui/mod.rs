//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into core::Action values and performs the
//! effects `update` asks for (timers, requests, persistence).
//!
//! Background tasks report back over an `mpsc` channel. Their abort
//! handles are kept so Esc and delete-all can stop a turn mid-flight.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (waiting, revealing) or a copy marker showing: draws every
//!   ~80ms so the loading indicator animates and the marker expires on time.
//! - **Idle**: sleeps up to 500ms and only redraws on events or resize.

mod clipboard;
mod component;
mod components;
mod event;
mod theme;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, Theme};
use crate::core::store::{ChatStore, FileStore, KeyValueStore};
use crate::core::transcript::Status;
use crate::inference::{CompletionProvider, GeminiProvider, ProviderError};
use crate::tui::clipboard::{CopiedMarker, copy_to_clipboard};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ConfirmDialog, ConfirmEvent, InputBox, InputEvent, MessageListState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::theme::Palette;

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigate messages with arrow keys. Typing auto-switches to Input.
    Cursor,
    /// Text editing in the input box. Esc switches to Cursor.
    Input,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub input_mode: InputMode,
    /// Highlighted suggestion on the landing page
    pub suggestion_index: Option<usize>,
    /// Delete-all confirmation (None = hidden)
    pub confirm: Option<ConfirmDialog>,
    pub copied: CopiedMarker,
}

impl TuiState {
    pub fn new(theme: Theme) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(Palette::for_theme(theme)),
            input_mode: InputMode::Input, // User expects to type immediately
            suggestion_index: None,
            confirm: None,
            copied: CopiedMarker::default(),
        }
    }

    /// Move the landing-page highlight by `delta`, wrapping around.
    fn cycle_suggestion(&mut self, delta: isize, count: usize) {
        if count == 0 {
            return;
        }
        let next = match self.suggestion_index {
            None if delta >= 0 => 0,
            None => count - 1,
            Some(i) => (i as isize + delta).rem_euclid(count as isize) as usize,
        };
        self.suggestion_index = Some(next);
    }

    /// Forget everything tied to the deleted transcript.
    fn reset_after_delete(&mut self) {
        self.message_list.reset();
        self.input_mode = InputMode::Input;
        self.suggestion_index = None;
        self.copied.clear();
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Keyboard enhancement lets Shift+Enter through; ignored where unsupported
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the Gemini provider from a resolved config.
pub fn build_provider(
    config: &ResolvedConfig,
) -> Result<Arc<dyn CompletionProvider>, ProviderError> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        ProviderError::Config(
            "Gemini API key must be set (config file or GEMINI_API_KEY env var)".to_string(),
        )
    })?;
    Ok(Arc::new(GeminiProvider::new(
        api_key,
        Some(config.base_url.clone()),
        config.model_name.clone(),
        config.request_timeout,
    )))
}

/// Performs effects and owns everything they need: the store, the action
/// channel and the abort handles of in-flight tasks.
struct EffectRunner<S: KeyValueStore> {
    store: ChatStore<S>,
    tx: mpsc::Sender<Action>,
    tasks: Vec<AbortHandle>,
    response_delay: Duration,
    reveal_interval: Duration,
}

impl<S: KeyValueStore> EffectRunner<S> {
    /// Returns true when the app should quit.
    fn apply(&mut self, app: &App, effect: Effect) -> bool {
        match effect {
            Effect::None => {}
            Effect::Quit => return true,
            Effect::ScheduleCompletion => self.schedule_completion(),
            Effect::SpawnRequest(prompt) => self.spawn_request(app.provider.clone(), prompt),
            Effect::StartReveal { ticks } => self.start_reveal(ticks),
            Effect::SaveTranscript => {
                // The turn has settled; its tasks are done
                self.tasks.clear();
                self.store.save(&app.transcript.to_snapshot());
            }
            Effect::ClearStore => {
                self.abort_all();
                self.store.clear();
            }
            Effect::SaveTheme(theme) => self.store.save_theme(theme),
        }
        false
    }

    fn abort_all(&mut self) {
        for handle in self.tasks.drain(..) {
            handle.abort();
        }
    }

    /// Remember a task for cancellation, dropping handles of finished ones.
    fn track(&mut self, handle: AbortHandle) {
        self.tasks.retain(|h| !h.is_finished());
        self.tasks.push(handle);
    }

    fn schedule_completion(&mut self) {
        let tx = self.tx.clone();
        let delay = self.response_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(Action::BeginCompletion).is_err() {
                warn!("Failed to send BeginCompletion: receiver dropped");
            }
        });
        self.track(handle.abort_handle());
    }

    fn spawn_request(&mut self, provider: Arc<dyn CompletionProvider>, prompt: String) {
        info!("Spawning {} request ({} bytes)", provider.name(), prompt.len());
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let action = match provider.complete(&prompt).await {
                Ok(text) => Action::CompletionSucceeded(text),
                Err(e) => {
                    warn!("Completion error: {}", e);
                    Action::CompletionFailed(e.display_text())
                }
            };
            if tx.send(action).is_err() {
                warn!("Failed to send completion result: receiver dropped");
            }
        });
        self.track(handle.abort_handle());
    }

    fn start_reveal(&mut self, ticks: usize) {
        debug!("Starting reveal: {} ticks every {:?}", ticks, self.reveal_interval);
        let tx = self.tx.clone();
        let period = self.reveal_interval;
        if period.is_zero() {
            for _ in 0..ticks {
                if tx.send(Action::RevealTick).is_err() {
                    break;
                }
            }
            return;
        }
        let handle = tokio::spawn(async move {
            let mut interval =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            for _ in 0..ticks {
                interval.tick().await;
                if tx.send(Action::RevealTick).is_err() {
                    return;
                }
            }
        });
        self.track(handle.abort_handle());
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider = build_provider(&config).map_err(|e| std::io::Error::other(e.to_string()))?;
    let mut app = App::from_config(provider, &config);

    let store = ChatStore::new(FileStore::open(&config.storage_path));
    app.restore(store.load().as_deref(), store.load_theme());
    info!(
        "Restored {} messages from {}",
        app.transcript.len(),
        store.inner().path().display()
    );

    let mut tui = TuiState::new(app.theme);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let (tx, rx) = mpsc::channel();
    let mut runner = EffectRunner {
        store,
        tx,
        tasks: Vec::new(),
        response_delay: config.response_delay,
        reveal_interval: config.reveal_interval,
    };

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        tui.input_box.busy = app.busy;
        tui.input_box.dimmed = matches!(tui.input_mode, InputMode::Cursor);

        let animating = app.busy || tui.copied.active(Instant::now()).is_some();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 6.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            // Ctrl+C always quits regardless of mode
            if matches!(event, TuiEvent::ForceQuit) {
                let effect = update(&mut app, Action::Quit);
                should_quit |= runner.apply(&app, effect);
                continue;
            }

            // While the confirm dialog is open it receives every event
            if let Some(dialog) = tui.confirm.as_mut() {
                match dialog.handle_event(&event) {
                    Some(ConfirmEvent::Confirmed) => {
                        runner.abort_all();
                        let effect = update(&mut app, Action::DeleteAll);
                        should_quit |= runner.apply(&app, effect);
                        tui.reset_after_delete();
                        tui.confirm = None;
                    }
                    Some(ConfirmEvent::Dismissed) => tui.confirm = None,
                    None => {}
                }
                continue;
            }

            match event {
                TuiEvent::DeleteAll => {
                    tui.confirm = Some(ConfirmDialog::new());
                    continue;
                }
                TuiEvent::ToggleTheme => {
                    let effect = update(&mut app, Action::ToggleTheme);
                    should_quit |= runner.apply(&app, effect);
                    continue;
                }
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown => {
                    tui.message_list.handle_event(&event);
                    continue;
                }
                // Esc while a turn is in flight cancels it, in either mode
                TuiEvent::Escape if app.busy => {
                    runner.abort_all();
                    let effect = update(&mut app, Action::CancelGeneration);
                    should_quit |= runner.apply(&app, effect);
                    continue;
                }
                _ => {}
            }

            match tui.input_mode {
                InputMode::Input => {
                    if let Some(action) = handle_input_mode(&event, &app, &mut tui) {
                        let effect = update(&mut app, action);
                        should_quit |= runner.apply(&app, effect);
                    }
                }
                InputMode::Cursor => handle_cursor_mode(&event, &mut app, &mut tui),
            }
        }

        if should_quit {
            break;
        }

        // Actions from background tasks (timers, replies, reveal ticks)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if runner.apply(&app, effect) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    runner.abort_all();
    ratatui::restore();
    Ok(())
}

/// Input mode: editing, submitting and picking suggestions.
fn handle_input_mode(event: &TuiEvent, app: &App, tui: &mut TuiState) -> Option<Action> {
    let landing = app.header_visible && app.transcript.is_empty();

    match event {
        TuiEvent::Escape => {
            tui.input_mode = InputMode::Cursor;
            tui.message_list.selected_index = app.transcript.len().checked_sub(1);
            tui.message_list.scroll_to_selected();
            return None;
        }
        TuiEvent::NextSuggestion if landing => {
            tui.cycle_suggestion(1, app.suggestions.len());
            return None;
        }
        TuiEvent::PrevSuggestion if landing => {
            tui.cycle_suggestion(-1, app.suggestions.len());
            return None;
        }
        // Enter on an empty box sends the highlighted suggestion
        TuiEvent::Submit if landing && tui.input_box.buffer.trim().is_empty() => {
            let suggestion = tui
                .suggestion_index
                .and_then(|i| app.suggestions.get(i))?
                .clone();
            tui.suggestion_index = None;
            return Some(Action::Submit(suggestion));
        }
        // Keep the draft while a turn is in flight
        TuiEvent::Submit if app.busy => return None,
        _ => {}
    }

    match tui.input_box.handle_event(event)? {
        InputEvent::Submit(text) => Some(Action::Submit(text)),
        InputEvent::ContentChanged => None,
    }
}

/// Cursor mode: select messages and copy them.
fn handle_cursor_mode(event: &TuiEvent, app: &mut App, tui: &mut TuiState) {
    let len = app.transcript.len();
    match event {
        TuiEvent::CursorUp => tui.message_list.move_selection(-1, len),
        TuiEvent::CursorDown => tui.message_list.move_selection(1, len),
        TuiEvent::InputChar('c') => copy_selected(app, tui),
        // Typing auto-switches to Input mode and forwards the event
        TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
            tui.input_mode = InputMode::Input;
            tui.message_list.selected_index = None;
            tui.input_box.handle_event(event);
        }
        TuiEvent::Submit => {
            tui.input_mode = InputMode::Input;
            tui.message_list.selected_index = None;
        }
        _ => {}
    }
}

fn copy_selected(app: &mut App, tui: &mut TuiState) {
    let Some(index) = tui.message_list.selected_index else {
        return;
    };
    let Some(message) = app.transcript.messages().get(index) else {
        return;
    };
    if message.status == Status::Pending {
        return;
    }

    if copy_to_clipboard(&message.text) {
        tui.copied.mark(index, Instant::now());
    } else {
        app.status_message = String::from("Clipboard unavailable");
    }
}
