use super::kinds::{ParagraphBuffer, TableBuffer};

/// The active parse mode. Exactly one is in effect at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Inside a code fence; lines are kept verbatim.
    InCodeBlock {
        language: String,
        body: Vec<String>,
        start_line: usize,
    },
    InTable(TableBuffer),
    /// A pipe row held for one line until the next line shows whether it
    /// heads a table.
    PendingTableHeader { line: String, line_index: usize },
    PendingParagraph(ParagraphBuffer),
}

/// Parse state threaded through [`BlockParser::feed`](super::BlockParser::feed).
///
/// A value owned by one render pass; dropping it cancels the parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
    pub mode: Mode,
    /// The last line-level block was a list item, so indented lines
    /// continue it.
    pub in_list: bool,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn with_mode(mode: Mode, in_list: bool) -> Self {
        Self { mode, in_list }
    }

    /// True when nothing is buffered, so `finish` would emit nothing.
    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Normal
    }
}
