use std::sync::Arc;

/// An inclusive range of source line indices `[start, end]`.
///
/// Every emitted block carries one so search matches and jump targets can be
/// correlated back to the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct LineSpan {
    /// First source line (0-based).
    pub start: usize,
    /// Last source line, inclusive.
    pub end: usize,
}

impl LineSpan {
    /// A span covering a single line.
    #[must_use]
    pub fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of lines covered.
    #[must_use]
    pub fn len(self) -> usize {
        self.end - self.start + 1
    }

    /// Always false: a span covers at least one line.
    #[must_use]
    pub fn is_empty(self) -> bool {
        false
    }

    #[must_use]
    pub fn contains(self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }
}

/// Immutable document text split into lines.
///
/// Lines are split on `\r\n`, `\r` and `\n`; the terminators are dropped. A
/// render pass owns its `Document` exclusively; cloning is cheap because the
/// lines are shared.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Arc<[String]>,
}

impl Document {
    pub fn new(text: &str) -> Self {
        Self {
            lines: split_lines(text).map(str::to_owned).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Splits text into lines, normalising `\r\n`, `\r` and `\n`.
///
/// A trailing terminator yields a final empty line, so `"a\n"` is `["a", ""]`
/// and the empty string is a single empty line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let s = rest?;
        match s.find(['\r', '\n']) {
            Some(i) => {
                let skip = if s[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&s[i + skip..]);
                Some(&s[..i])
            }
            None => {
                rest = None;
                Some(s)
            }
        }
    })
}
