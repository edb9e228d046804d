use std::sync::OnceLock;

use regex::Regex;

/// Bold (`**text**`, `__text__`) and italic (`*text*`, `_text_`).
///
/// Bold runs in its own pass before italic, so `**x**` is never read as two
/// italic delimiters around `*x*`.
pub struct Emphasis;

impl Emphasis {
    pub fn bold() -> &'static Regex {
        static BOLD: OnceLock<Regex> = OnceLock::new();
        BOLD.get_or_init(|| {
            Regex::new(r"\*\*([^*]+)\*\*|__([^_]+)__").expect("Invalid bold regex")
        })
    }

    pub fn italic() -> &'static Regex {
        static ITALIC: OnceLock<Regex> = OnceLock::new();
        ITALIC.get_or_init(|| Regex::new(r"\*([^*]+)\*|_([^_]+)_").expect("Invalid italic regex"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_accepts_both_delimiters() {
        assert!(Emphasis::bold().is_match("**strong**"));
        assert!(Emphasis::bold().is_match("__strong__"));
    }

    #[test]
    fn italic_accepts_both_delimiters() {
        assert!(Emphasis::italic().is_match("*soft*"));
        assert!(Emphasis::italic().is_match("_soft_"));
    }

    #[test]
    fn lone_delimiter_is_not_emphasis() {
        assert!(!Emphasis::bold().is_match("2 ** 3"));
        assert!(!Emphasis::italic().is_match("a * b"));
    }
}
