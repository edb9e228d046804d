use serde::Serialize;

use crate::{document::LineSpan, parsing::inline::Run};

pub use super::kinds::{Alignment, ListMarker};

/// The kind-specific payload of an emitted block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BlockKind {
    /// ATX heading; `level` is 1..=6.
    Header { level: u8, text: String },
    /// Merged plain lines. `list_continuation` marks text indented under a
    /// list item.
    Paragraph {
        runs: Vec<Run>,
        list_continuation: bool,
    },
    ListItem { marker: ListMarker, runs: Vec<Run> },
    TaskItem { checked: bool, runs: Vec<Run> },
    /// `depth` counts the `>` prefixes.
    Blockquote { depth: u8, runs: Vec<Run> },
    /// Verbatim fence body; `language` is the text after the opening fence.
    CodeBlock { language: String, content: String },
    /// Header row first. Every row has `alignments.len()` cells and
    /// `row_lines[i]` is the source line of `rows[i]`.
    Table {
        alignments: Vec<Alignment>,
        rows: Vec<Vec<Vec<Run>>>,
        row_lines: Vec<usize>,
    },
    Image { src: String, alt: String },
    Video { src: String, alt: String },
    Separator,
    Spacer,
}

/// A completed top-level block and the source lines it came from.
///
/// Blocks are never mutated once emitted; a changed search highlight is a
/// new parse pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    pub lines: LineSpan,
}

impl Block {
    pub fn new(kind: BlockKind, lines: LineSpan) -> Self {
        Self { kind, lines }
    }

    /// The first source line of the block.
    pub fn source_line(&self) -> usize {
        self.lines.start
    }

    /// Returns `(level, text)` for a header block.
    pub fn header(&self) -> Option<(u8, &str)> {
        match &self.kind {
            BlockKind::Header { level, text } => Some((*level, text)),
            _ => None,
        }
    }

    /// All inline runs carried by the block, in reading order.
    pub fn runs(&self) -> Box<dyn Iterator<Item = &Run> + '_> {
        match &self.kind {
            BlockKind::Paragraph { runs, .. }
            | BlockKind::ListItem { runs, .. }
            | BlockKind::TaskItem { runs, .. }
            | BlockKind::Blockquote { runs, .. } => Box::new(runs.iter()),
            BlockKind::Table { rows, .. } => Box::new(rows.iter().flatten().flatten()),
            _ => Box::new(std::iter::empty()),
        }
    }
}
