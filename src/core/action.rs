//! # Actions
//!
//! Everything that can happen in gemchat becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The service answers? That's `Action::CompletionSucceeded(text)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing the I/O the caller must
//! perform next. No side effects here. I/O happens in the TUI loop.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! One turn walks through the reducer like this:
//!
//! ```text
//! Submit ──► ScheduleCompletion ─(delay)─► BeginCompletion ──► SpawnRequest
//!                                                                   │
//!        ┌─────────────── CompletionFailed ◄────────────────────────┤
//!        ▼                                                          ▼
//!      idle ◄── SaveTranscript ◄── RevealTick × n ◄── CompletionSucceeded
//! ```

use log::{debug, info};

use crate::core::reveal::{Reveal, RevealStep};
use crate::core::state::{App, Theme};
use crate::core::transcript::{Message, Status};

/// Text shown in place of a reply when the user cancels a pending request.
pub const CANCELLED_TEXT: &str = "Generation cancelled";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// User sent a prompt (typed or picked from the suggestions).
    Submit(String),
    /// The post-submit delay elapsed; time to show the pending reply and ask the service.
    BeginCompletion,
    CompletionSucceeded(String),
    /// Request failed; carries the text to show in place of the reply.
    CompletionFailed(String),
    RevealTick,
    CancelGeneration,
    DeleteAll,
    ToggleTheme,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Wait the response delay, then dispatch `BeginCompletion`.
    ScheduleCompletion,
    /// Send this prompt to the completion provider.
    SpawnRequest(String),
    /// Start a ticker that dispatches `RevealTick` this many times.
    StartReveal { ticks: usize },
    SaveTranscript,
    ClearStore,
    SaveTheme(Theme),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            let prompt = text.trim();
            if prompt.is_empty() || app.busy {
                debug!("Submit ignored (empty={}, busy={})", prompt.is_empty(), app.busy);
                return Effect::None;
            }

            app.busy = true;
            app.transcript.append(Message::user(prompt));
            app.pending_prompt = Some(prompt.to_string());
            app.header_visible = false;
            app.status_message = String::from("Thinking...");
            Effect::ScheduleCompletion
        }
        Action::BeginCompletion => {
            let Some(prompt) = app.pending_prompt.take().filter(|_| app.busy) else {
                debug!("BeginCompletion ignored: no turn in flight");
                return Effect::None;
            };

            app.pending_reply = Some(app.transcript.append(Message::pending_reply()));
            Effect::SpawnRequest(prompt)
        }
        Action::CompletionSucceeded(text) => {
            let Some(handle) = app.pending_reply.take() else {
                debug!("Stale completion ignored ({} bytes)", text.len());
                return Effect::None;
            };

            let reveal = Reveal::new(handle, &text);
            let ticks = reveal.remaining();
            info!("Reply received: {} bytes, {} tokens", text.len(), ticks);
            app.reveal = Some(reveal);
            if ticks == 0 {
                return finish_turn(app);
            }

            app.status_message = String::from("Typing...");
            Effect::StartReveal { ticks }
        }
        Action::CompletionFailed(text) => {
            let Some(handle) = app.pending_reply.take() else {
                debug!("Stale failure ignored: {}", text);
                return Effect::None;
            };

            info!("Completion failed: {}", text);
            app.transcript.set_text(handle, text);
            app.transcript.set_status(handle, Status::Error);
            app.busy = false;
            app.status_message = String::from("Request failed");
            Effect::None
        }
        Action::RevealTick => {
            let Some(reveal) = app.reveal.as_mut() else {
                return Effect::None;
            };

            match reveal.advance(&mut app.transcript) {
                RevealStep::Continue => Effect::None,
                RevealStep::Finished => finish_turn(app),
            }
        }
        Action::CancelGeneration => {
            if !app.busy {
                return Effect::None;
            }

            app.pending_prompt = None;
            if let Some(reveal) = app.reveal.as_mut() {
                reveal.finish(&mut app.transcript);
                info!("Reveal cancelled, remaining text flushed");
                return finish_turn(app);
            }

            if let Some(handle) = app.pending_reply.take() {
                app.transcript.set_text(handle, CANCELLED_TEXT);
                app.transcript.set_status(handle, Status::Error);
            }
            app.busy = false;
            app.status_message = String::from("Cancelled");
            info!("Generation cancelled");
            Effect::None
        }
        Action::DeleteAll => {
            app.transcript.clear();
            app.busy = false;
            app.pending_prompt = None;
            app.pending_reply = None;
            app.reveal = None;
            app.header_visible = true;
            app.status_message = String::from("All chats deleted");
            Effect::ClearStore
        }
        Action::ToggleTheme => {
            app.theme = app.theme.toggled();
            app.status_message = format!("Theme: {}", app.theme.label());
            Effect::SaveTheme(app.theme)
        }
        Action::Quit => Effect::Quit,
    }
}

/// Marks the revealed reply complete, releases the session flag, and asks
/// for the transcript to be persisted.
fn finish_turn(app: &mut App) -> Effect {
    if let Some(reveal) = app.reveal.take() {
        app.transcript.set_status(reveal.handle(), Status::Complete);
    }
    app.busy = false;
    app.status_message = String::new();
    Effect::SaveTranscript
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::Role;
    use crate::test_support::test_app;

    /// Drives a full successful turn and returns the effects in order.
    fn run_turn(app: &mut App, prompt: &str, reply: &str) -> Vec<Effect> {
        let mut effects = vec![update(app, Action::Submit(prompt.to_string()))];
        effects.push(update(app, Action::BeginCompletion));
        let effect = update(app, Action::CompletionSucceeded(reply.to_string()));
        effects.push(effect.clone());
        if let Effect::StartReveal { ticks } = effect {
            for _ in 0..ticks {
                effects.push(update(app, Action::RevealTick));
            }
        }
        effects
    }

    #[test]
    fn test_submit_appends_outgoing_and_sets_busy() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("  Hello  ".to_string()));

        assert_eq!(effect, Effect::ScheduleCompletion);
        assert!(app.busy);
        assert!(!app.header_visible);
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript.messages()[0], Message::user("Hello"));
        assert_eq!(app.pending_prompt.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_empty_submit_is_noop() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Submit("   \n ".to_string())), Effect::None);
        assert!(!app.busy);
        assert!(app.transcript.is_empty());
        assert!(app.header_visible);
    }

    #[test]
    fn test_submit_while_busy_is_noop() {
        let mut app = test_app();
        update(&mut app, Action::Submit("first".to_string()));
        update(&mut app, Action::BeginCompletion);
        let len = app.transcript.len();

        assert_eq!(update(&mut app, Action::Submit("second".to_string())), Effect::None);
        assert_eq!(app.transcript.len(), len);
        assert_eq!(update(&mut app, Action::BeginCompletion), Effect::None);
    }

    #[test]
    fn test_begin_completion_appends_pending_reply() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hello".to_string()));
        let effect = update(&mut app, Action::BeginCompletion);

        assert_eq!(effect, Effect::SpawnRequest("Hello".to_string()));
        assert_eq!(app.transcript.len(), 2);
        let reply = &app.transcript.messages()[1];
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.status, Status::Pending);
        assert!(reply.text.is_empty());
        assert!(app.pending_prompt.is_none());
    }

    #[test]
    fn test_full_round_trip_reveals_and_persists() {
        let mut app = test_app();
        let effects = run_turn(&mut app, "Hello", "Hi there, friend!");

        assert_eq!(effects[2], Effect::StartReveal { ticks: 3 });
        assert_eq!(effects.last(), Some(&Effect::SaveTranscript));
        assert_eq!(
            effects.iter().filter(|e| **e == Effect::SaveTranscript).count(),
            1
        );
        assert!(!app.busy);
        assert!(!app.is_revealing());
        let reply = &app.transcript.messages()[1];
        assert_eq!(reply.text, "Hi there, friend!");
        assert_eq!(reply.status, Status::Complete);
    }

    #[test]
    fn test_multiline_reply_is_revealed_verbatim() {
        let mut app = test_app();
        let reply = "Steps:\n\n1. Boil water\n2. Add  pasta\n\n```sh\nmake run\n```";
        run_turn(&mut app, "Hello", reply);

        assert_eq!(app.transcript.messages()[1].text, reply);
        assert_eq!(app.transcript.messages()[1].status, Status::Complete);
    }

    #[test]
    fn test_busy_until_last_tick() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hello".to_string()));
        update(&mut app, Action::BeginCompletion);
        update(&mut app, Action::CompletionSucceeded("a b".to_string()));

        assert!(app.busy);
        assert_eq!(update(&mut app, Action::RevealTick), Effect::None);
        assert!(app.busy);
        assert_eq!(app.transcript.messages()[1].text, "a");
        assert_eq!(app.transcript.messages()[1].status, Status::Pending);
        assert_eq!(update(&mut app, Action::RevealTick), Effect::SaveTranscript);
        assert!(!app.busy);
    }

    #[test]
    fn test_empty_reply_completes_with_zero_ticks() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hello".to_string()));
        update(&mut app, Action::BeginCompletion);
        let effect = update(&mut app, Action::CompletionSucceeded("  ".to_string()));

        assert_eq!(effect, Effect::SaveTranscript);
        assert!(!app.busy);
        assert_eq!(app.transcript.messages()[1].status, Status::Complete);
        assert!(app.transcript.messages()[1].text.is_empty());
    }

    #[test]
    fn test_failure_marks_error_and_releases_flag() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hello".to_string()));
        update(&mut app, Action::BeginCompletion);
        let effect = update(&mut app, Action::CompletionFailed("quota exceeded".to_string()));

        assert_eq!(effect, Effect::None);
        assert!(!app.busy);
        let reply = &app.transcript.messages()[1];
        assert_eq!(reply.text, "quota exceeded");
        assert_eq!(reply.status, Status::Error);

        // A new turn is accepted right away.
        assert_eq!(
            update(&mut app, Action::Submit("again".to_string())),
            Effect::ScheduleCompletion
        );
    }

    #[test]
    fn test_cancel_while_waiting_marks_error() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hello".to_string()));
        update(&mut app, Action::BeginCompletion);

        assert_eq!(update(&mut app, Action::CancelGeneration), Effect::None);
        assert!(!app.busy);
        assert_eq!(app.transcript.messages()[1].text, CANCELLED_TEXT);
        assert_eq!(app.transcript.messages()[1].status, Status::Error);

        // The late reply is ignored.
        assert_eq!(
            update(&mut app, Action::CompletionSucceeded("late".to_string())),
            Effect::None
        );
        assert_eq!(app.transcript.messages()[1].text, CANCELLED_TEXT);
    }

    #[test]
    fn test_cancel_during_delay_drops_the_turn() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hello".to_string()));
        update(&mut app, Action::CancelGeneration);

        assert!(!app.busy);
        assert_eq!(update(&mut app, Action::BeginCompletion), Effect::None);
        assert_eq!(app.transcript.len(), 1);
    }

    #[test]
    fn test_cancel_during_reveal_flushes_and_persists() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hello".to_string()));
        update(&mut app, Action::BeginCompletion);
        update(&mut app, Action::CompletionSucceeded("one two three".to_string()));
        update(&mut app, Action::RevealTick);

        assert_eq!(update(&mut app, Action::CancelGeneration), Effect::SaveTranscript);
        assert!(!app.busy);
        assert_eq!(app.transcript.messages()[1].text, "one two three");
        assert_eq!(app.transcript.messages()[1].status, Status::Complete);
        assert_eq!(update(&mut app, Action::RevealTick), Effect::None);
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::CancelGeneration), Effect::None);
    }

    #[test]
    fn test_delete_all_resets_everything() {
        let mut app = test_app();
        run_turn(&mut app, "Hello", "Hi");
        update(&mut app, Action::Submit("more".to_string()));

        assert_eq!(update(&mut app, Action::DeleteAll), Effect::ClearStore);
        assert!(app.transcript.is_empty());
        assert!(app.header_visible);
        assert!(!app.busy);
        assert!(app.pending_prompt.is_none());
        assert_eq!(update(&mut app, Action::BeginCompletion), Effect::None);
    }

    #[test]
    fn test_toggle_theme_is_independent_of_busy() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hello".to_string()));

        assert_eq!(update(&mut app, Action::ToggleTheme), Effect::SaveTheme(Theme::Light));
        assert!(app.busy);
        assert_eq!(update(&mut app, Action::ToggleTheme), Effect::SaveTheme(Theme::Dark));
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
