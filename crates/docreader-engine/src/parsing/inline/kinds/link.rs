use std::sync::OnceLock;

use regex::Regex;

/// `[text](target)` links and `~~text~~` strikethrough.
///
/// Both are extracted in the first inline pass as atomic spans, leftmost
/// first, so a link inside strikethrough delimiters (or vice versa) is never
/// split.
pub struct Link;

impl Link {
    /// Group 1/2 capture a link's text and target; group 3 captures the
    /// struck-through text.
    pub fn pattern() -> &'static Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| {
            Regex::new(r"\[([^\]]+)\]\(([^)]+)\)|~~([^~]+)~~").expect("Invalid link regex")
        })
    }
}
