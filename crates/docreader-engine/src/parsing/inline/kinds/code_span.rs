use std::sync::OnceLock;

use regex::Regex;

/// Inline code span: `` `code` ``.
///
/// Code spans are claimed before emphasis and are never search-highlighted.
pub struct CodeSpan;

impl CodeSpan {
    pub fn pattern() -> &'static Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| Regex::new(r"`([^`]+)`").expect("Invalid code span regex"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_single_tick_span() {
        let caps = CodeSpan::pattern().captures("run `cargo test` now").unwrap();
        assert_eq!(&caps[1], "cargo test");
    }

    #[test]
    fn empty_span_does_not_match() {
        assert!(CodeSpan::pattern().captures("``").is_none());
    }
}
