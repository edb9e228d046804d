//! # Rendering
//!
//! Drives the block parser over a document in bounded slices so a host
//! event loop can stay responsive while a long document renders.
//!
//! A render is started with [`RenderScheduler::start`] and advanced with
//! [`RenderScheduler::tick`]. Starting another render invalidates the
//! previous handle at once; its buffered state is dropped and it never
//! reaches the sink again.

mod sink;

pub use sink::{RenderSink, VecSink};

use crate::{
    document::Document,
    navigation::Navigator,
    parsing::blocks::{Block, BlockParser, ParserState},
};

/// Lines parsed per tick unless the host asks otherwise.
pub const DEFAULT_LINES_PER_TICK: usize = 100;

/// Identifies one render pass. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    Done,
}

struct Pass {
    handle: RenderHandle,
    document: Document,
    parser: BlockParser,
    state: ParserState,
    cursor: usize,
    emitted: usize,
}

/// Cooperative, single-threaded render driver.
///
/// Emitted blocks go to the sink in source order and to the [`Navigator`],
/// which builds the heading outline as they arrive.
pub struct RenderScheduler<S: RenderSink> {
    sink: S,
    navigator: Navigator,
    last_epoch: u64,
    active: Option<Pass>,
}

impl<S: RenderSink> RenderScheduler<S> {
    pub fn new(sink: S) -> Self {
        Self::with_navigator(sink, Navigator::default())
    }

    pub fn with_navigator(sink: S, navigator: Navigator) -> Self {
        Self {
            sink,
            navigator,
            last_epoch: 0,
            active: None,
        }
    }

    /// Begins rendering `document`, superseding any render in progress.
    ///
    /// The sink is reset before anything of the new render reaches it.
    pub fn start(&mut self, document: Document, search_term: Option<&str>) -> RenderHandle {
        if let Some(old) = self.active.take() {
            log::debug!(
                "render #{} cancelled at line {}/{}",
                old.handle.0,
                old.cursor,
                old.document.len()
            );
        }
        self.last_epoch += 1;
        let handle = RenderHandle(self.last_epoch);
        log::debug!("render #{}: {} lines", handle.0, document.len());

        self.sink.reset();
        self.navigator.reset();
        self.active = Some(Pass {
            handle,
            document,
            parser: BlockParser::new(search_term),
            state: ParserState::new(),
            cursor: 0,
            emitted: 0,
        });
        handle
    }

    /// Parses up to `budget` lines of the render identified by `handle`.
    ///
    /// When the document is exhausted the parser is flushed, the sink is
    /// told the render finished, and `Done` is returned. A stale or finished
    /// handle does nothing and reports `Done`.
    pub fn tick(&mut self, handle: RenderHandle, budget: usize) -> Status {
        let Some(pass) = self.active.as_mut().filter(|p| p.handle == handle) else {
            return Status::Done;
        };

        for _ in 0..budget.max(1) {
            let Some(line) = pass.document.line(pass.cursor) else {
                break;
            };
            let state = std::mem::take(&mut pass.state);
            let (state, blocks) = pass.parser.feed(state, line, pass.cursor);
            pass.state = state;
            pass.cursor += 1;
            for block in blocks {
                emit(&mut self.sink, &mut self.navigator, &mut pass.emitted, block);
            }
        }

        if pass.cursor < pass.document.len() {
            return Status::Continue;
        }

        let Some(mut pass) = self.active.take() else {
            return Status::Done;
        };
        for block in pass.parser.finish(std::mem::take(&mut pass.state)) {
            emit(&mut self.sink, &mut self.navigator, &mut pass.emitted, block);
        }
        log::debug!(
            "render #{} done: {} blocks, {} headings",
            pass.handle.0,
            pass.emitted,
            self.navigator.headings().len()
        );
        self.sink.finished(self.navigator.headings());
        Status::Done
    }

    /// Ticks until done. For hosts that do not need to interleave work.
    pub fn run_to_end(&mut self, handle: RenderHandle, budget: usize) {
        while self.tick(handle, budget) == Status::Continue {}
    }

    /// Abandons the render if `handle` is still the active one.
    ///
    /// Blocks it already emitted are withdrawn from the sink and the outline.
    pub fn cancel(&mut self, handle: RenderHandle) {
        if self.is_active(handle) {
            self.active = None;
            self.sink.reset();
            self.navigator.reset();
            log::debug!("render #{} cancelled", handle.0);
        }
    }

    pub fn is_active(&self, handle: RenderHandle) -> bool {
        self.active.as_ref().is_some_and(|p| p.handle == handle)
    }

    /// `(lines parsed, total lines)` of the active render.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.active.as_ref().map(|p| (p.cursor, p.document.len()))
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }
}

fn emit<S: RenderSink>(sink: &mut S, navigator: &mut Navigator, emitted: &mut usize, block: Block) {
    navigator.observe(&block);
    sink.push(block);
    *emitted += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_document;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn long_document(lines: usize) -> String {
        (0..lines)
            .map(|i| match i % 5 {
                0 => format!("# Heading {i}"),
                1 => "| a | b |".to_string(),
                2 => "|---|---|".to_string(),
                3 => format!("| {i} | x |"),
                _ => format!("text {i}"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(100)]
    fn sliced_render_matches_whole_parse(#[case] budget: usize) {
        let text = long_document(37);
        let mut scheduler = RenderScheduler::new(VecSink::default());
        let handle = scheduler.start(Document::new(&text), None);
        scheduler.run_to_end(handle, budget);

        assert_eq!(scheduler.sink().blocks, parse_document(&text, None).blocks);
        assert!(scheduler.sink().finished);
    }

    #[test]
    fn budget_bounds_lines_per_tick() {
        let text = long_document(250);
        let mut scheduler = RenderScheduler::new(VecSink::default());
        let handle = scheduler.start(Document::new(&text), None);

        assert_eq!(scheduler.tick(handle, 100), Status::Continue);
        assert_eq!(scheduler.progress(), Some((100, 250)));
        assert_eq!(scheduler.tick(handle, 100), Status::Continue);
        assert!(!scheduler.sink().finished);
        assert_eq!(scheduler.tick(handle, 100), Status::Done);
        assert!(scheduler.sink().finished);
        assert_eq!(scheduler.sink().headings.len(), 50);
        assert_eq!(scheduler.progress(), None);
    }

    #[test]
    fn new_render_supersedes_old_one() {
        let mut scheduler = RenderScheduler::new(VecSink::default());
        let a = scheduler.start(Document::new(&long_document(50)), None);
        scheduler.tick(a, 7);
        assert!(!scheduler.sink().blocks.is_empty());

        let b = scheduler.start(Document::new("# Only B\nbody of b"), None);
        assert!(scheduler.sink().blocks.is_empty());
        assert_eq!(scheduler.tick(a, 100), Status::Done);
        assert!(scheduler.sink().blocks.is_empty());

        scheduler.run_to_end(b, 100);
        assert_eq!(scheduler.sink().blocks, parse_document("# Only B\nbody of b", None).blocks);
        assert_eq!(scheduler.sink().headings.len(), 1);
        assert_eq!(scheduler.sink().headings[0].text, "Only B");
    }

    #[test]
    fn cancelled_render_emits_nothing_more() {
        let mut scheduler = RenderScheduler::new(VecSink::default());
        let handle = scheduler.start(Document::new("para\nstill para"), None);
        scheduler.tick(handle, 1);
        scheduler.cancel(handle);

        assert!(!scheduler.is_active(handle));
        assert_eq!(scheduler.tick(handle, 100), Status::Done);
        assert!(scheduler.sink().blocks.is_empty());
        assert!(!scheduler.sink().finished);
    }

    #[test]
    fn cancel_withdraws_emitted_blocks() {
        let mut scheduler = RenderScheduler::new(VecSink::default());
        let handle = scheduler.start(Document::new("# A\n# B\n# C\n# D"), None);
        scheduler.tick(handle, 2);
        assert_eq!(scheduler.sink().blocks.len(), 2);

        scheduler.cancel(handle);

        assert!(scheduler.sink().blocks.is_empty());
        assert!(scheduler.navigator().headings().is_empty());
        assert_eq!(scheduler.tick(handle, 100), Status::Done);
        assert!(scheduler.sink().blocks.is_empty());
    }

    #[test]
    fn cancelling_stale_handle_keeps_current_output() {
        let mut scheduler = RenderScheduler::new(VecSink::default());
        let old = scheduler.start(Document::new("# Old"), None);
        let current = scheduler.start(Document::new("# New\n# Newer"), None);
        scheduler.tick(current, 1);

        scheduler.cancel(old);

        assert_eq!(scheduler.sink().blocks.len(), 1);
        assert!(scheduler.is_active(current));
    }

    #[test]
    fn zero_budget_still_makes_progress() {
        let mut scheduler = RenderScheduler::new(VecSink::default());
        let handle = scheduler.start(Document::new("a\nb"), None);
        assert_eq!(scheduler.tick(handle, 0), Status::Continue);
        assert_eq!(scheduler.tick(handle, 0), Status::Done);
    }

    #[test]
    fn navigator_outline_follows_render() {
        let mut scheduler = RenderScheduler::new(VecSink::default());
        let handle = scheduler.start(Document::new("# A\ntext\n## B"), None);
        scheduler.run_to_end(handle, 100);

        let lines: Vec<usize> = scheduler.navigator().headings().iter().map(|h| h.line).collect();
        assert_eq!(lines, vec![0, 2]);
        assert_eq!(scheduler.navigator().block_for_line(1), Some(1));
    }

    #[test]
    fn search_term_reaches_inline_formatting() {
        let mut scheduler = RenderScheduler::new(VecSink::default());
        let handle = scheduler.start(Document::new("find the needle"), Some("needle"));
        scheduler.run_to_end(handle, 100);
        let highlighted = scheduler.sink().blocks[0].runs().filter(|r| r.is_highlight()).count();
        assert_eq!(highlighted, 1);
    }
}
