//! Display cleanup applied to replies before they reach the transcript.

use std::sync::LazyLock;

use regex::Regex;

static BOLD_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(.*?)\*\*").expect("bold marker pattern is valid")
});

/// Removes markdown bold markers: `**text**` becomes `text`.
///
/// One left-to-right pass of the non-greedy pattern `\*\*(.*?)\*\*`. Matches
/// never span a newline. Nested or unbalanced markers get whatever that
/// single pass produces; a lone `**` is left as is.
pub fn strip_bold_markers(text: &str) -> String {
    BOLD_MARKERS.replace_all(text, "$1").into_owned()
}
