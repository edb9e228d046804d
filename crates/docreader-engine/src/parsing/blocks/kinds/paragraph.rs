use crate::document::LineSpan;

/// Text accumulated for a paragraph that has not been emitted yet.
///
/// Consecutive plain lines merge into one paragraph. Adjacent CJK
/// ideographs join without a separator; everything else joins with one
/// space. A line ending in two spaces is a hard break, kept as `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphBuffer {
    text: String,
    start_line: usize,
    end_line: usize,
    list_continuation: bool,
}

impl ParagraphBuffer {
    /// Trailing marker of a hard line break.
    pub const HARD_BREAK: &'static str = "  ";

    /// Starts a plain paragraph, or `None` for a line with no text.
    pub fn start(line: &str, index: usize) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let mut text = trimmed.to_string();
        if line.ends_with(Self::HARD_BREAK) {
            text.push('\n');
        }
        Some(Self {
            text,
            start_line: index,
            end_line: index,
            list_continuation: false,
        })
    }

    /// Starts a paragraph continuing the preceding list item.
    pub fn continuation(line: &str, index: usize) -> Self {
        Self {
            text: line.trim().to_string(),
            start_line: index,
            end_line: index,
            list_continuation: true,
        }
    }

    /// Merges a plain line into the buffer.
    pub fn push_line(&mut self, line: &str, index: usize) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        let last = self.text.chars().next_back();
        let first = trimmed.chars().next();
        match (last, first) {
            (Some('\n'), _) => {}
            (Some(a), Some(b)) if is_cjk(a) && is_cjk(b) => {}
            _ => self.text.push(' '),
        }
        self.text.push_str(trimmed);
        if line.ends_with(Self::HARD_BREAK) {
            self.text.push('\n');
        }
        self.end_line = index;
    }

    /// Appends an indented list continuation line.
    pub fn push_continuation(&mut self, line: &str, index: usize) {
        self.text.push(' ');
        self.text.push_str(line.trim());
        self.end_line = index;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> LineSpan {
        LineSpan::new(self.start_line, self.end_line)
    }

    pub fn is_list_continuation(&self) -> bool {
        self.list_continuation
    }
}

/// CJK unified ideographs, extension A and compatibility ideographs.
pub fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}
