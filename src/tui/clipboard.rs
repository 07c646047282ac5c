//! System clipboard access for the copy-message command.

use std::time::{Duration, Instant};

use log::{debug, warn};

/// How long the "copied" marker stays on a message.
pub const COPIED_MARKER_DURATION: Duration = Duration::from_secs(1);

/// Copies `text` to the system clipboard. Returns `false` if no clipboard is available.
pub fn copy_to_clipboard(text: &str) -> bool {
    let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
    match result {
        Ok(()) => {
            debug!("Copied {} bytes to clipboard", text.len());
            true
        }
        Err(e) => {
            warn!("Clipboard unavailable: {}", e);
            false
        }
    }
}

/// Remembers which message was copied last, for the transient marker.
#[derive(Debug, Default, Clone, Copy)]
pub struct CopiedMarker {
    copied: Option<(usize, Instant)>,
}

impl CopiedMarker {
    pub fn mark(&mut self, index: usize, now: Instant) {
        self.copied = Some((index, now));
    }

    /// Index of the message showing the marker at `now`, if any.
    pub fn active(&self, now: Instant) -> Option<usize> {
        self.copied
            .filter(|(_, at)| now.duration_since(*at) < COPIED_MARKER_DURATION)
            .map(|(index, _)| index)
    }

    pub fn clear(&mut self) {
        self.copied = None;
    }
}
