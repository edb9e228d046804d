//! Markdown document viewer core.
//!
//! Parses Markdown into display blocks in bounded slices, searches a
//! document corpus on a worker thread and navigates headings and matches.

pub mod document;
pub mod io;
pub mod models;
pub mod navigation;
pub mod parsing;
pub mod render;
pub mod search;
pub mod viewer;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use document::{Document, LineSpan};
pub use io::*;
pub use models::{Corpus, CorpusEntry, DocumentId};
pub use navigation::{Direction, HeaderEntry, LinkTarget, Navigator};
pub use parsing::{
    blocks::{Alignment, Block, BlockKind, BlockParser, ListMarker, ParserState},
    inline::{InlineFormatter, Run, RunStyle},
    parse_document,
};
pub use render::{RenderHandle, RenderScheduler, RenderSink, Status, VecSink};
pub use search::{ContentCache, ContentSource, SearchError, SearchIndexer, SearchMatch, SearchMode};
pub use viewer::{DocViewer, LinkAction, PumpOutcome, ViewerOptions};
