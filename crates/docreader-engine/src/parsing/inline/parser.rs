use regex::{Captures, Regex, RegexBuilder};

use crate::parsing::blocks::kinds::Media;

use super::{
    kinds::{CodeSpan, Emphasis, Link},
    types::{Run, RunStyle},
};

/// A slice of the input that is either still unclaimed or already typed.
///
/// Later passes only look inside `Open` pieces, which is what keeps runs
/// non-overlapping.
enum Piece<'a> {
    Open(&'a str),
    Claimed(Run),
}

/// Converts a line of text into formatted [`Run`]s.
///
/// Holds the compiled search-term matcher so a render pass builds it once
/// and reuses it for every line.
#[derive(Debug, Clone, Default)]
pub struct InlineFormatter {
    highlight: Option<Regex>,
}

impl InlineFormatter {
    /// Creates a formatter; a non-empty `search_term` enables highlighting.
    pub fn new(search_term: Option<&str>) -> Self {
        let highlight = search_term
            .filter(|t| !t.is_empty())
            .and_then(|term| {
                RegexBuilder::new(&regex::escape(term))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| log::warn!("search term not highlightable: {e}"))
                    .ok()
            });
        Self { highlight }
    }

    /// Returns true when search highlighting is active.
    pub fn highlights(&self) -> bool {
        self.highlight.is_some()
    }

    /// Formats `text` into runs.
    ///
    /// # Pass order
    /// 1. links and strikethrough (atomic)
    /// 2. inline code
    /// 3. bold
    /// 4. italic
    /// 5. search highlight, only inside text no earlier pass claimed
    ///
    /// Unmatched delimiters stay literal text.
    pub fn format(&self, text: &str) -> Vec<Run> {
        let mut pieces = vec![Piece::Open(text)];

        pieces = claim(pieces, Link::pattern(), link_run);
        pieces = claim(pieces, CodeSpan::pattern(), |c| Run::new(&c[1], RunStyle::Code));
        pieces = claim(pieces, Emphasis::bold(), |c| {
            Run::new(first_group(c), RunStyle::Bold)
        });
        pieces = claim(pieces, Emphasis::italic(), |c| {
            Run::new(first_group(c), RunStyle::Italic)
        });
        if let Some(re) = &self.highlight {
            pieces = claim(pieces, re, |c| Run::new(&c[0], RunStyle::Highlight));
        }

        pieces
            .into_iter()
            .filter_map(|p| match p {
                Piece::Open("") => None,
                Piece::Open(s) => Some(Run::plain(s)),
                Piece::Claimed(run) => Some(run),
            })
            .collect()
    }
}

/// Formats `text` with an optional search term.
pub fn format(text: &str, search_term: Option<&str>) -> Vec<Run> {
    InlineFormatter::new(search_term).format(text)
}

/// Runs one pass: every leftmost non-overlapping match of `re` inside an open
/// piece becomes a claimed run; the text around it stays open.
fn claim<'a>(
    pieces: Vec<Piece<'a>>,
    re: &Regex,
    make: impl Fn(&Captures<'a>) -> Run,
) -> Vec<Piece<'a>> {
    let mut out = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let text = match piece {
            Piece::Open(text) => text,
            claimed => {
                out.push(claimed);
                continue;
            }
        };

        let mut last = 0;
        for caps in re.captures_iter(text) {
            let Some(m) = caps.get(0) else { continue };
            if m.start() > last {
                out.push(Piece::Open(&text[last..m.start()]));
            }
            out.push(Piece::Claimed(make(&caps)));
            last = m.end();
        }
        if last < text.len() {
            out.push(Piece::Open(&text[last..]));
        }
    }
    out
}

fn link_run(caps: &Captures<'_>) -> Run {
    match (caps.get(1), caps.get(2), caps.get(3)) {
        (Some(label), Some(target), _) if Media::is_video_source(target.as_str()) => Run::new(
            label.as_str(),
            RunStyle::Video {
                src: target.as_str().to_string(),
            },
        ),
        (Some(label), Some(target), _) => Run::new(
            label.as_str(),
            RunStyle::Link {
                target: target.as_str().to_string(),
            },
        ),
        (_, _, Some(struck)) => Run::new(struck.as_str(), RunStyle::Strikethrough),
        _ => Run::plain(&caps[0]),
    }
}

/// Returns whichever alternative of a two-delimiter pattern participated.
fn first_group<'a>(caps: &Captures<'a>) -> &'a str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map_or("", |m| m.as_str())
}
