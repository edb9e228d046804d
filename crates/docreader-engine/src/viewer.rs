use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    document::Document,
    io::IoError,
    models::DocumentId,
    navigation::{Direction, HeaderEntry, LinkTarget, Navigator, classify_link, resolve_document_path},
    render::{DEFAULT_LINES_PER_TICK, RenderHandle, RenderScheduler, RenderSink, Status},
    search::{SearchError, SearchIndexer, SearchMatch, SearchMode, indexer::DEFAULT_DEBOUNCE},
};

/// Tunables a host passes to [`DocViewer`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    pub lines_per_tick: usize,
    pub debounce: Duration,
    pub lead_margin: f32,
    pub search_mode: SearchMode,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            lines_per_tick: DEFAULT_LINES_PER_TICK,
            debounce: DEFAULT_DEBOUNCE,
            lead_margin: crate::navigation::DEFAULT_LEAD_MARGIN,
            search_mode: SearchMode::FileName,
        }
    }
}

/// What one [`DocViewer::pump`] call changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PumpOutcome {
    /// The open document finished rendering during this pump.
    pub rendered: bool,
    /// A new search result set was published.
    pub matches: Option<Arc<[SearchMatch]>>,
    /// Block index the host should scroll to.
    pub scroll_to: Option<usize>,
}

/// Where following a link leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Hand the URL to the system.
    External(String),
    /// Scroll the open document to this block.
    ScrollTo(usize),
    /// Open another corpus document, optionally at a heading.
    Open {
        document: DocumentId,
        anchor: Option<String>,
    },
    Unresolved,
}

struct OpenDocument {
    id: Option<DocumentId>,
    document: Document,
    handle: RenderHandle,
    rendering: bool,
    jump_to: Option<usize>,
}

/// The viewer core: one open document, its render, the corpus search and
/// navigation between headings and matches.
///
/// Hosts call [`pump`](Self::pump) from their event loop; nothing here
/// blocks.
pub struct DocViewer<S: RenderSink> {
    options: ViewerOptions,
    scheduler: RenderScheduler<S>,
    indexer: SearchIndexer,
    open: Option<OpenDocument>,
    matches: Arc<[SearchMatch]>,
    highlight: Option<String>,
}

impl<S: RenderSink> DocViewer<S> {
    pub fn new(sink: S, indexer: SearchIndexer, options: ViewerOptions) -> Self {
        let scheduler = RenderScheduler::with_navigator(sink, Navigator::new(options.lead_margin));
        Self {
            indexer: indexer.with_debounce(options.debounce),
            scheduler,
            open: None,
            matches: Vec::new().into(),
            highlight: None,
            options,
        }
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    /// Renders already-loaded text, superseding the current document.
    ///
    /// `jump_to` is a source line to select once rendering finishes.
    pub fn render(&mut self, text: &str, id: Option<DocumentId>, jump_to: Option<usize>) -> RenderHandle {
        let document = Document::new(text);
        let handle = self.scheduler.start(document.clone(), self.highlight.as_deref());
        self.open = Some(OpenDocument {
            id,
            document,
            handle,
            rendering: true,
            jump_to,
        });
        handle
    }

    /// Loads a corpus document through the search cache and renders it.
    pub fn open(&mut self, id: DocumentId, jump_to: Option<usize>) -> Result<RenderHandle, IoError> {
        let path = self
            .indexer
            .corpus()
            .get(id)
            .map(|entry| entry.relative_path().to_relative_path_buf())
            .ok_or_else(|| IoError::NotFound(format!("document #{}", id.0).into()))?;
        let text = self.indexer.load(&path)?;
        Ok(self.render(&text, Some(id), jump_to))
    }

    /// Opens the document of a search match at its line.
    pub fn open_match(&mut self, hit: &SearchMatch) -> Result<RenderHandle, IoError> {
        self.open(hit.document, hit.line)
    }

    /// Advances the render by one tick and collects search results.
    pub fn pump(&mut self, now: Instant) -> Result<PumpOutcome, SearchError> {
        let mut outcome = PumpOutcome::default();

        if let Some(open) = self.open.as_mut().filter(|o| o.rendering)
            && self.scheduler.tick(open.handle, self.options.lines_per_tick) == Status::Done
        {
            open.rendering = false;
            outcome.rendered = true;
            outcome.scroll_to = self.apply_matches(true);
        }

        if let Some(published) = self.indexer.poll(now)? {
            self.matches = Arc::clone(&published);
            outcome.matches = Some(published);
            if let Some(scroll) = self.on_published() {
                outcome.scroll_to = Some(scroll);
            }
        }
        Ok(outcome)
    }

    /// Pumps until the open document is rendered and no search is running,
    /// or `timeout` passes.
    pub fn settle(&mut self, timeout: Duration) -> Result<PumpOutcome, SearchError> {
        let deadline = Instant::now() + timeout;
        let mut merged = PumpOutcome::default();
        loop {
            if let Some(published) = self.indexer.wait(deadline.saturating_duration_since(Instant::now()))? {
                self.matches = Arc::clone(&published);
                merged.matches = Some(published);
                if let Some(scroll) = self.on_published() {
                    merged.scroll_to = Some(scroll);
                }
            }
            let outcome = self.pump(Instant::now())?;
            merged.rendered |= outcome.rendered;
            merged.matches = outcome.matches.or(merged.matches);
            merged.scroll_to = outcome.scroll_to.or(merged.scroll_to);

            let idle = !self.is_rendering() && !self.indexer.is_busy();
            if idle || Instant::now() >= deadline {
                return Ok(merged);
            }
        }
    }

    /// Records a search query; the scan runs after the debounce period.
    pub fn set_query(&mut self, term: &str, mode: SearchMode, now: Instant) {
        self.options.search_mode = mode;
        self.indexer.set_query(term, mode, now);
    }

    /// Steps to the next or previous match in the open document.
    pub fn navigate_match(&mut self, direction: Direction) -> Option<usize> {
        self.scheduler.navigator_mut().next(direction)
    }

    /// Selects the match closest to `line` in the open document.
    pub fn jump_to_line(&mut self, line: usize) -> Option<usize> {
        self.scheduler.navigator_mut().resolve_anchor(line)
    }

    /// The heading the reader is in at scroll offset `offset`.
    pub fn on_scroll(&self, offset: f32) -> Option<&HeaderEntry> {
        self.scheduler.navigator().active_heading(offset)
    }

    /// Works out what following `url` from the open document means.
    pub fn follow_link(&self, url: &str) -> LinkAction {
        let navigator = self.scheduler.navigator();
        match classify_link(url) {
            LinkTarget::External(url) => LinkAction::External(url.to_string()),
            LinkTarget::Anchor(anchor) => navigator
                .heading_for_anchor(anchor)
                .map_or(LinkAction::Unresolved, |h| LinkAction::ScrollTo(h.block_index)),
            LinkTarget::Document { path, anchor } => {
                let corpus = self.indexer.corpus();
                let current = self.open.as_ref().and_then(|o| o.id).and_then(|id| corpus.get(id));
                let resolved = match current {
                    Some(entry) => resolve_document_path(entry.relative_path(), path),
                    None => relative_path::RelativePath::new(path).normalize(),
                };
                match corpus.find_by_path(&resolved) {
                    Some(entry) => LinkAction::Open {
                        document: entry.id(),
                        anchor: anchor.map(str::to_string),
                    },
                    None => {
                        log::warn!("link target {resolved} is not in the corpus");
                        LinkAction::Unresolved
                    }
                }
            }
        }
    }

    pub fn is_rendering(&self) -> bool {
        self.open.as_ref().is_some_and(|o| o.rendering)
    }

    pub fn open_document(&self) -> Option<DocumentId> {
        self.open.as_ref().and_then(|o| o.id)
    }

    /// Source text of the open document.
    pub fn document(&self) -> Option<&Document> {
        self.open.as_ref().map(|o| &o.document)
    }

    /// The latest published search results across the corpus.
    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn navigator(&self) -> &Navigator {
        self.scheduler.navigator()
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        self.scheduler.navigator_mut()
    }

    pub fn sink(&self) -> &S {
        self.scheduler.sink()
    }

    pub fn indexer(&self) -> &SearchIndexer {
        &self.indexer
    }

    pub fn indexer_mut(&mut self) -> &mut SearchIndexer {
        &mut self.indexer
    }

    /// Reacts to a new result set: a changed highlight term re-renders the
    /// open document, otherwise the match anchors are refreshed in place.
    fn on_published(&mut self) -> Option<usize> {
        let highlight = self
            .indexer
            .published_query()
            .filter(|q| q.mode == SearchMode::Content && !q.term.is_empty())
            .map(|q| q.term.clone());

        if highlight != self.highlight {
            self.highlight = highlight;
            if let Some(open) = self.open.take() {
                // Keep the reader's place: the pending target, else the
                // match already selected.
                let jump_to = open.jump_to.or_else(|| {
                    self.scheduler
                        .navigator()
                        .current_match()
                        .and_then(|m| m.line)
                });
                let text = open.document.lines().join("\n");
                self.render(&text, open.id, jump_to);
            }
            return None;
        }
        if self.is_rendering() {
            return None;
        }
        self.apply_matches(false)
    }

    /// Hands the open document's matches to the navigator. After a render,
    /// also selects the pending jump target or the first match.
    fn apply_matches(&mut self, after_render: bool) -> Option<usize> {
        let open = self.open.as_mut()?;
        let jump_to = open.jump_to.take();
        let navigator = self.scheduler.navigator_mut();
        match open.id {
            Some(id) => navigator.set_matches(&self.matches, id),
            None => navigator.clear_matches(),
        }
        if !after_render {
            return None;
        }
        match jump_to {
            Some(line) => {
                navigator.resolve_anchor(line);
                navigator.current_block().or_else(|| navigator.block_for_line(line))
            }
            None => {
                navigator.next(Direction::Next)?;
                navigator.current_block()
            }
        }
    }
}
