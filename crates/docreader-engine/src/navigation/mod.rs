//! # Navigation
//!
//! The outline of the open document and the search matches inside it.

pub mod links;

use serde::Serialize;

use crate::{
    document::LineSpan,
    models::DocumentId,
    parsing::blocks::Block,
    search::SearchMatch,
};

pub use links::{LinkTarget, classify_link, normalize_anchor, resolve_document_path};

/// Default distance below the viewport top that still counts as "reached".
pub const DEFAULT_LEAD_MARGIN: f32 = 50.0;

/// A heading discovered while rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderEntry {
    pub level: u8,
    pub text: String,
    /// Index of the header block in the render output.
    pub block_index: usize,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Heading anchors and search-match anchors for the open document.
#[derive(Debug, Clone)]
pub struct Navigator {
    headings: Vec<HeaderEntry>,
    /// Rendered vertical position of each heading, parallel to `headings`.
    positions: Vec<f32>,
    block_spans: Vec<LineSpan>,
    matches: Vec<SearchMatch>,
    current: Option<usize>,
    lead_margin: f32,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(DEFAULT_LEAD_MARGIN)
    }
}

impl Navigator {
    pub fn new(lead_margin: f32) -> Self {
        Self {
            headings: Vec::new(),
            positions: Vec::new(),
            block_spans: Vec::new(),
            matches: Vec::new(),
            current: None,
            lead_margin,
        }
    }

    /// Rebuilds the outline from a finished render.
    pub fn build_headings(&mut self, blocks: &[Block]) -> &[HeaderEntry] {
        self.reset_outline();
        for block in blocks {
            self.observe(block);
        }
        &self.headings
    }

    /// Records the next emitted block of the current render.
    ///
    /// Until the host reports layout, a heading's position is its source
    /// line.
    pub fn observe(&mut self, block: &Block) {
        let block_index = self.block_spans.len();
        self.block_spans.push(block.lines);
        if let Some((level, text)) = block.header() {
            self.headings.push(HeaderEntry {
                level,
                text: text.to_string(),
                block_index,
                line: block.source_line(),
            });
            self.positions.push(block.source_line() as f32);
        }
    }

    /// Forgets the outline and the match anchors, for a new document.
    pub fn reset(&mut self) {
        self.reset_outline();
        self.clear_matches();
    }

    fn reset_outline(&mut self) {
        self.headings.clear();
        self.positions.clear();
        self.block_spans.clear();
    }

    pub fn headings(&self) -> &[HeaderEntry] {
        &self.headings
    }

    /// Records rendered positions for the first `positions.len()` headings.
    pub fn set_heading_positions(&mut self, positions: &[f32]) {
        for (slot, &y) in self.positions.iter_mut().zip(positions) {
            *slot = y;
        }
    }

    /// The heading the reader is in at scroll offset `viewport_offset`.
    ///
    /// That is the last heading at or above `viewport_offset + lead_margin`,
    /// or the first heading when none is.
    pub fn active_heading(&self, viewport_offset: f32) -> Option<&HeaderEntry> {
        let limit = viewport_offset + self.lead_margin;
        let active = self
            .positions
            .iter()
            .take_while(|&&y| y <= limit)
            .count()
            .saturating_sub(1);
        self.headings.get(active)
    }

    /// Heading targeted by a `#anchor` link.
    ///
    /// Exact normalized match first, then either text containing the other;
    /// the first hit in document order wins.
    pub fn heading_for_anchor(&self, anchor: &str) -> Option<&HeaderEntry> {
        let wanted = normalize_anchor(anchor.trim_start_matches('#'));
        if wanted.is_empty() {
            return None;
        }
        let normalized: Vec<String> = self.headings.iter().map(|h| normalize_anchor(&h.text)).collect();
        let found = normalized
            .iter()
            .position(|h| *h == wanted)
            .or_else(|| {
                normalized
                    .iter()
                    .position(|h| !h.is_empty() && (h.contains(&wanted) || wanted.contains(h.as_str())))
            });
        if found.is_none() {
            log::warn!("no heading matches anchor {anchor:?}");
        }
        found.and_then(|i| self.headings.get(i))
    }

    /// Index of the block containing `line`, or of the next block after it.
    pub fn block_for_line(&self, line: usize) -> Option<usize> {
        self.block_spans
            .iter()
            .position(|span| span.contains(line) || span.start > line)
    }

    /// Replaces the match anchors with the line matches in `document`.
    ///
    /// Resets the current match.
    pub fn set_matches(&mut self, matches: &[SearchMatch], document: DocumentId) {
        self.matches = matches
            .iter()
            .filter(|m| m.document == document && m.line.is_some())
            .cloned()
            .collect();
        self.current = None;
    }

    pub fn clear_matches(&mut self) {
        self.matches.clear();
        self.current = None;
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_match(&self) -> Option<&SearchMatch> {
        self.matches.get(self.current?)
    }

    /// `(1-based current, total)` for a "3/7" indicator.
    pub fn match_position(&self) -> Option<(usize, usize)> {
        self.current.map(|i| (i + 1, self.matches.len()))
    }

    /// Selects the match closest to `target_line`; ties go to the earlier
    /// match.
    pub fn resolve_anchor(&mut self, target_line: usize) -> Option<usize> {
        let (index, _) = self
            .matches
            .iter()
            .enumerate()
            .filter_map(|(i, m)| Some((i, m.line?.abs_diff(target_line))))
            .min_by_key(|&(_, distance)| distance)?;
        self.current = Some(index);
        self.current
    }

    /// Steps the current match, wrapping at either end.
    pub fn next(&mut self, direction: Direction) -> Option<usize> {
        let count = self.matches.len();
        if count == 0 {
            return None;
        }
        let index = match (self.current, direction) {
            (None, Direction::Next) => 0,
            (None, Direction::Previous) => count - 1,
            (Some(i), Direction::Next) => (i + 1) % count,
            (Some(i), Direction::Previous) => (i + count - 1) % count,
        };
        self.current = Some(index);
        self.current
    }

    /// Block index of the current match, for scrolling to it.
    pub fn current_block(&self) -> Option<usize> {
        self.block_for_line(self.current_match()?.line?)
    }
}
