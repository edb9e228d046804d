use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use docreader_engine::{
    DocViewer, Direction, DocumentId, LinkAction, RunStyle, SearchMatch, SearchMode, VecSink,
};
use ratatui::widgets::ListState;

use crate::view::{DocLayout, ROW_HEIGHT};

const PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Results,
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A row of the results panel.
enum Entry {
    Document(DocumentId),
    Match(SearchMatch),
}

pub struct App {
    viewer: DocViewer<VecSink>,
    focus: Focus,
    query: String,
    mode: SearchMode,
    results_state: ListState,
    layout: DocLayout,
    laid_out_blocks: usize,
    layout_dirty: bool,
    marked_block: Option<usize>,
    scroll: usize,
    pending_scroll: Option<usize>,
    pending_anchor: Option<String>,
    status: Option<String>,
}

impl App {
    pub fn new(viewer: DocViewer<VecSink>) -> Self {
        let mode = viewer.options().search_mode;
        let mut app = Self {
            viewer,
            focus: Focus::Results,
            query: String::new(),
            mode,
            results_state: ListState::default(),
            layout: DocLayout::default(),
            laid_out_blocks: 0,
            layout_dirty: false,
            marked_block: None,
            scroll: 0,
            pending_scroll: None,
            pending_anchor: None,
            status: None,
        };
        if !app.viewer.indexer().corpus().is_empty() {
            app.results_state.select(Some(0));
            app.open_selected();
        }
        app
    }

    pub fn viewer(&self) -> &DocViewer<VecSink> {
        &self.viewer
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn layout(&self) -> &DocLayout {
        &self.layout
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn results_state(&mut self) -> &mut ListState {
        &mut self.results_state
    }

    pub fn mode_label(&self) -> &'static str {
        match self.mode {
            SearchMode::FileName => "file names",
            SearchMode::Content => "content",
        }
    }

    /// Advances rendering and collects search results; call once per frame.
    pub fn pump(&mut self) -> Result<()> {
        let outcome = self.viewer.pump(Instant::now())?;
        self.layout_dirty |= outcome.rendered;
        if outcome.rendered
            && let Some(anchor) = self.pending_anchor.take()
        {
            match self.viewer.navigator().heading_for_anchor(&anchor) {
                Some(heading) => self.pending_scroll = Some(heading.block_index),
                None => self.status = Some(format!("No heading for #{anchor}")),
            }
        }
        if outcome.matches.is_some() {
            let len = self.entries().len();
            let selected = self.results_state.selected().filter(|&i| i < len);
            self.results_state
                .select(selected.or((len > 0).then_some(0)));
        }
        if let Some(block) = outcome.scroll_to {
            self.pending_scroll = Some(block);
        }
        self.mark_current_match();
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if self.focus == Focus::Search {
            self.handle_search_key(key);
            return Flow::Continue;
        }

        self.status = None;
        match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Tab => self.toggle_mode(),
            KeyCode::Left | KeyCode::Char('h') => self.focus = Focus::Results,
            KeyCode::Right | KeyCode::Char('l') => self.focus = Focus::Document,
            KeyCode::Char('n') => self.step_match(Direction::Next),
            KeyCode::Char('N') => self.step_match(Direction::Previous),
            KeyCode::Char('f') => self.follow_first_link(),
            KeyCode::PageDown => self.scroll_by(PAGE as isize),
            KeyCode::PageUp => self.scroll_by(-(PAGE as isize)),
            KeyCode::Down | KeyCode::Char('j') => match self.focus {
                Focus::Results => self.move_selection(1),
                _ => self.scroll_by(1),
            },
            KeyCode::Up | KeyCode::Char('k') => match self.focus {
                Focus::Results => self.move_selection(-1),
                _ => self.scroll_by(-1),
            },
            KeyCode::Enter if self.focus == Focus::Results => {
                self.open_selected();
                self.focus = Focus::Document;
            }
            _ => {}
        }
        Flow::Continue
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.focus = Focus::Results,
            KeyCode::Tab => self.toggle_mode(),
            KeyCode::Backspace => {
                self.query.pop();
                self.requery();
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.requery();
            }
            _ => {}
        }
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            SearchMode::FileName => SearchMode::Content,
            SearchMode::Content => SearchMode::FileName,
        };
        self.requery();
    }

    fn requery(&mut self) {
        self.viewer.set_query(&self.query, self.mode, Instant::now());
    }

    fn entries(&self) -> Vec<Entry> {
        if self.query.is_empty() {
            self.viewer
                .indexer()
                .corpus()
                .entries()
                .iter()
                .map(|e| Entry::Document(e.id()))
                .collect()
        } else {
            self.viewer
                .matches()
                .iter()
                .cloned()
                .map(Entry::Match)
                .collect()
        }
    }

    pub fn result_labels(&self) -> Vec<String> {
        let corpus = self.viewer.indexer().corpus();
        let name = |id: DocumentId| corpus.get(id).map_or("?", |e| e.display_name());
        self.entries()
            .into_iter()
            .map(|entry| match entry {
                Entry::Document(id) => corpus.get(id).map_or_else(String::new, |e| {
                    e.display_path().to_string()
                }),
                Entry::Match(m) => match m.line {
                    Some(line) => format!("{}:{}  {}", name(m.document), line + 1, m.snippet),
                    None => m.snippet,
                },
            })
            .collect()
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.entries().len();
        if len == 0 {
            return;
        }
        let current = self.results_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        self.results_state.select(Some(next));
    }

    fn open_selected(&mut self) {
        let Some(entry) = self
            .results_state
            .selected()
            .and_then(|i| self.entries().into_iter().nth(i))
        else {
            return;
        };
        let opened = match &entry {
            Entry::Document(id) => self.viewer.open(*id, None),
            Entry::Match(hit) => self.viewer.open_match(hit),
        };
        match opened {
            Ok(_) => self.reset_view(),
            Err(e) => {
                log::error!("failed to open document: {e}");
                self.status = Some(format!("Error reading file: {e}"));
            }
        }
    }

    fn open_document(&mut self, id: DocumentId, anchor: Option<String>) {
        match self.viewer.open(id, None) {
            Ok(_) => {
                self.reset_view();
                self.pending_anchor = anchor;
            }
            Err(e) => self.status = Some(format!("Error reading file: {e}")),
        }
    }

    fn reset_view(&mut self) {
        self.layout = DocLayout::default();
        self.laid_out_blocks = 0;
        self.layout_dirty = true;
        self.scroll = 0;
        self.pending_scroll = None;
        self.pending_anchor = None;
    }

    fn step_match(&mut self, direction: Direction) {
        if self.viewer.navigate_match(direction).is_none() {
            self.status = Some("No matches in this document".to_string());
            return;
        }
        self.mark_current_match();
        self.pending_scroll = self.marked_block;
    }

    fn mark_current_match(&mut self) {
        let current = self.viewer.navigator().current_block();
        if current != self.marked_block {
            self.marked_block = current;
            self.layout_dirty = true;
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.layout.lines.len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    /// Follows the first link at or below the top of the document panel.
    fn follow_first_link(&mut self) {
        let first_block = self.layout.block_at_line(self.scroll).unwrap_or(0);
        let target = self
            .viewer
            .sink()
            .blocks
            .iter()
            .skip(first_block)
            .flat_map(|b| b.runs())
            .find_map(|run| match &run.style {
                RunStyle::Link { target } => Some(target.clone()),
                _ => None,
            });
        let Some(target) = target else {
            self.status = Some("No link in view".to_string());
            return;
        };

        match self.viewer.follow_link(&target) {
            LinkAction::External(url) => self.status = Some(format!("External link: {url}")),
            LinkAction::ScrollTo(block) => self.pending_scroll = Some(block),
            LinkAction::Open { document, anchor } => self.open_document(document, anchor),
            LinkAction::Unresolved => self.status = Some(format!("Cannot follow {target}")),
        }
    }

    /// Brings the layout up to date with the rendered blocks and applies a
    /// pending scroll target.
    pub fn relayout(&mut self, width: usize, height: usize) {
        let blocks = &self.viewer.sink().blocks;
        if self.layout_dirty || self.layout.width != width || self.laid_out_blocks != blocks.len() {
            self.layout = DocLayout::build(blocks, width, self.marked_block);
            self.laid_out_blocks = blocks.len();
            self.layout_dirty = false;
            let positions: Vec<f32> = self
                .viewer
                .navigator()
                .headings()
                .iter()
                .map(|h| self.layout.line_of_block(h.block_index) as f32 * ROW_HEIGHT)
                .collect();
            self.viewer.navigator_mut().set_heading_positions(&positions);
        }

        if let Some(block) = self.pending_scroll
            && block < self.laid_out_blocks
        {
            self.pending_scroll = None;
            let line = self.layout.line_of_block(block);
            self.scroll = line.saturating_sub(height / 3);
        }
    }

    /// Block of the heading the reader is currently in.
    pub fn active_heading_block(&self) -> Option<usize> {
        self.viewer
            .on_scroll(self.scroll as f32 * ROW_HEIGHT)
            .map(|h| h.block_index)
    }

    pub fn document_title(&self) -> String {
        let corpus = self.viewer.indexer().corpus();
        let name = self
            .viewer
            .open_document()
            .and_then(|id| corpus.get(id))
            .map_or("Document", |e| e.display_name());
        let mut title = name.to_string();
        if self.viewer.is_rendering() {
            title.push_str(" (rendering…)");
        }
        if let Some((current, total)) = self.viewer.navigator().match_position() {
            title.push_str(&format!(" [{current}/{total}]"));
        }
        title
    }
}
