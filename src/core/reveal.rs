//! # Reveal
//!
//! Word-by-word disclosure of a finished reply.
//!
//! The reply is split on single spaces up front and rejoined with single
//! spaces, so newlines and indentation stay inside their tokens and the
//! final text equals the reply byte for byte. A blank reply has no tokens.
//!
//! Each tick appends the next token to the target message; the tick source
//! is a ticker task in the TUI that sends one `Action::RevealTick` per
//! period, so this type holds no timers and can be driven synchronously in
//! tests.

use std::collections::VecDeque;

use crate::core::transcript::{MessageHandle, Transcript};

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    Continue,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reveal {
    handle: MessageHandle,
    tokens: VecDeque<String>,
    started: bool,
}

impl Reveal {
    pub fn new(handle: MessageHandle, full_text: &str) -> Self {
        let tokens = if full_text.trim().is_empty() {
            VecDeque::new()
        } else {
            full_text.split(' ').map(str::to_string).collect()
        };
        Self {
            handle,
            tokens,
            started: false,
        }
    }

    pub fn handle(&self) -> MessageHandle {
        self.handle
    }

    /// Ticks still needed to finish.
    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_finished(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Appends the next token to the target message.
    pub fn advance(&mut self, transcript: &mut Transcript) -> RevealStep {
        if let Some(token) = self.tokens.pop_front() {
            if self.started {
                transcript.push_token(self.handle, &token);
            } else {
                transcript.set_text(self.handle, token);
                self.started = true;
            }
        }
        if self.tokens.is_empty() {
            RevealStep::Finished
        } else {
            RevealStep::Continue
        }
    }

    /// Flushes every remaining token at once.
    pub fn finish(&mut self, transcript: &mut Transcript) {
        while self.advance(transcript) == RevealStep::Continue {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::Message;

    fn setup(text: &str) -> (Transcript, Reveal) {
        let mut transcript = Transcript::new();
        let handle = transcript.append(Message::pending_reply());
        let reveal = Reveal::new(handle, text);
        (transcript, reveal)
    }

    #[test]
    fn test_one_token_per_tick() {
        let (mut transcript, mut reveal) = setup("one two three");
        assert_eq!(reveal.remaining(), 3);

        assert_eq!(reveal.advance(&mut transcript), RevealStep::Continue);
        assert_eq!(transcript.messages()[0].text, "one");
        assert_eq!(reveal.advance(&mut transcript), RevealStep::Continue);
        assert_eq!(transcript.messages()[0].text, "one two");
        assert_eq!(reveal.advance(&mut transcript), RevealStep::Finished);
        assert_eq!(transcript.messages()[0].text, "one two three");
    }

    #[test]
    fn test_multiline_reply_survives_reveal() {
        let reply = "Here:\n\n```js\nconst s = a.reduce((x, y) => x + y, 0);\n```";
        let (mut transcript, mut reveal) = setup(reply);
        reveal.finish(&mut transcript);
        assert_eq!(transcript.messages()[0].text, reply);
    }

    #[test]
    fn test_space_runs_and_edges_are_kept() {
        let reply = " Hi  there\tfriend ";
        let (mut transcript, mut reveal) = setup(reply);
        assert_eq!(reveal.remaining(), 5);
        reveal.finish(&mut transcript);
        assert_eq!(transcript.messages()[0].text, reply);
    }

    #[test]
    fn test_empty_text_needs_zero_ticks() {
        let (_, reveal) = setup(" \n\t ");
        assert_eq!(reveal.remaining(), 0);
        assert!(reveal.is_finished());
    }

    #[test]
    fn test_finish_flushes_remaining_tokens() {
        let (mut transcript, mut reveal) = setup("a b c d");
        reveal.advance(&mut transcript);
        reveal.finish(&mut transcript);
        assert!(reveal.is_finished());
        assert_eq!(transcript.messages()[0].text, "a b c d");
    }

    #[test]
    fn test_advance_on_cleared_transcript_does_not_panic() {
        let (mut transcript, mut reveal) = setup("a b");
        transcript.clear();
        assert_eq!(reveal.advance(&mut transcript), RevealStep::Continue);
        assert_eq!(reveal.advance(&mut transcript), RevealStep::Finished);
        assert!(transcript.is_empty());
    }
}
