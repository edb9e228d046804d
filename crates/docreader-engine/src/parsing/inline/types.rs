use serde::Serialize;

/// How a [`Run`] of text is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RunStyle {
    /// Text not claimed by any inline construct.
    Plain,
    Bold,
    Italic,
    /// An inline code span. No further formatting or highlighting inside.
    Code,
    Strikethrough,
    /// A clickable `[text](target)` link.
    Link { target: String },
    /// A `[text](clip.mp4)` link whose target is a video; embedded by the sink.
    Video { src: String },
    /// A case-insensitive occurrence of the active search term.
    Highlight,
}

/// A typed span of visible text produced by the inline formatter.
///
/// The runs of a line never overlap and, concatenated, give the line's
/// visible text (markup delimiters removed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub text: String,
    pub style: RunStyle,
}

impl Run {
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, RunStyle::Plain)
    }

    pub fn is_highlight(&self) -> bool {
        self.style == RunStyle::Highlight
    }
}

/// Concatenates the visible text of a run sequence.
pub fn visible_text(runs: &[Run]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}
