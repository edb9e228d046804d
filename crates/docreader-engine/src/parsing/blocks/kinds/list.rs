use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// The marker that introduced a list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ListMarker {
    /// `-`, `*` or `+`.
    Bullet,
    /// A numbered marker, kept as written (e.g. `"3."`).
    Ordered(String),
}

/// List item, task item and list continuation syntax.
pub struct ListItem;

impl ListItem {
    fn item_pattern() -> &'static Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| Regex::new(r"^\s*([-*+]|\d+\.)\s+").expect("Invalid list regex"))
    }

    fn task_pattern() -> &'static Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| {
            Regex::new(r"^\s*-\s+\[([ xX])\]\s+(.*)$").expect("Invalid task regex")
        })
    }

    /// Returns `(marker, text)` for an ordered or unordered list item.
    pub fn detect(line: &str) -> Option<(ListMarker, &str)> {
        let caps = Self::item_pattern().captures(line)?;
        let marker = caps.get(1)?.as_str();
        let end = caps.get(0)?.end();
        let marker = if marker.ends_with('.') {
            ListMarker::Ordered(marker.to_string())
        } else {
            ListMarker::Bullet
        };
        Some((marker, line[end..].trim_end()))
    }

    /// Returns `(checked, text)` for a `- [ ]` / `- [x]` task item.
    pub fn detect_task(line: &str) -> Option<(bool, &str)> {
        let caps = Self::task_pattern().captures(line)?;
        let checked = caps.get(1)?.as_str().eq_ignore_ascii_case("x");
        Some((checked, caps.get(2)?.as_str().trim_end()))
    }

    /// A line indented by two or more whitespace characters, or a tab,
    /// continues the preceding list item.
    pub fn is_continuation(line: &str) -> bool {
        line.starts_with('\t') || line.chars().take(2).filter(|c| c.is_whitespace()).count() == 2
    }
}
