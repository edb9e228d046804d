use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SendError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use relative_path::RelativePath;

use crate::{io::IoError, models::Corpus};

use super::{ContentCache, ContentSource, SearchError, SearchMatch, SearchMode, scan::scan_while};

/// Default quiet period between the last keystroke and the scan.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// How often `wait` checks that the worker is still alive.
const WORKER_CHECK: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub mode: SearchMode,
}

struct Pending {
    query: SearchQuery,
    epoch: u64,
    due: Instant,
}

struct ScanJob {
    epoch: u64,
    query: SearchQuery,
}

struct ScanResult {
    epoch: u64,
    query: SearchQuery,
    matches: Vec<SearchMatch>,
}

struct Worker {
    jobs: Sender<ScanJob>,
    handle: JoinHandle<()>,
}

/// Runs corpus scans on a background worker and publishes the newest result
/// set.
///
/// Each [`set_query`](Self::set_query) bumps a monotonic epoch. A scan
/// carries the epoch it started under; on arrival its result is published
/// only if that epoch is still the latest, otherwise it is dropped. Published
/// sets are swapped whole, so readers never see a partial set.
///
/// One long-lived worker thread runs the scans. It skips queued jobs that a
/// newer one has replaced and stops a running scan as soon as its epoch is
/// superseded. If the worker dies, the scan it owed is given up and the next
/// launch starts a new worker.
///
/// The indexer is driven by [`poll`](Self::poll) from the host's event loop.
pub struct SearchIndexer {
    corpus: Arc<Corpus>,
    source: Arc<dyn ContentSource>,
    cache: ContentCache,
    debounce: Duration,
    epoch: u64,
    latest: Arc<AtomicU64>,
    pending: Option<Pending>,
    awaiting: Option<u64>,
    worker: Option<Worker>,
    published: Arc<[SearchMatch]>,
    published_query: Option<SearchQuery>,
    fresh: bool,
    result_tx: Sender<ScanResult>,
    result_rx: Receiver<ScanResult>,
}

impl SearchIndexer {
    pub fn new(corpus: Corpus, source: impl ContentSource + 'static) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        Self {
            corpus: Arc::new(corpus),
            source: Arc::new(source),
            cache: ContentCache::new(),
            debounce: DEFAULT_DEBOUNCE,
            epoch: 0,
            latest: Arc::new(AtomicU64::new(0)),
            pending: None,
            awaiting: None,
            worker: None,
            published: Vec::new().into(),
            published_query: None,
            fresh: false,
            result_tx,
            result_rx,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Reads a corpus document through the content cache.
    pub fn load(&self, path: &RelativePath) -> Result<Arc<str>, IoError> {
        self.cache.get_or_load(path, self.source.as_ref())
    }

    /// Drops a changed document from the content cache.
    pub fn invalidate(&self, path: &RelativePath) -> bool {
        self.cache.invalidate(path)
    }

    /// Records a new query, superseding any pending or running one.
    ///
    /// The scan starts from `poll` once the debounce period has passed. An
    /// empty term publishes an empty set at once.
    pub fn set_query(&mut self, term: &str, mode: SearchMode, now: Instant) {
        self.epoch += 1;
        self.latest.store(self.epoch, Ordering::Release);
        self.awaiting = None;
        let query = SearchQuery {
            term: term.to_string(),
            mode,
        };
        if term.is_empty() {
            self.pending = None;
            self.publish(query, Vec::new());
            return;
        }
        self.pending = Some(Pending {
            query,
            epoch: self.epoch,
            due: now + self.debounce,
        });
    }

    /// Starts the pending scan now, skipping the rest of the debounce.
    pub fn flush(&mut self) -> Result<(), SearchError> {
        match self.pending.take() {
            Some(pending) => self.launch(pending),
            None => Ok(()),
        }
    }

    /// Launches a due scan and collects finished ones.
    ///
    /// Returns the newly published set if one was published since the last
    /// call.
    pub fn poll(&mut self, now: Instant) -> Result<Option<Arc<[SearchMatch]>>, SearchError> {
        if let Some(pending) = self.pending.take_if(|p| p.due <= now) {
            self.launch(pending)?;
        }
        self.drain();
        self.check_worker();
        Ok(self.take_fresh())
    }

    /// Starts any pending scan and blocks until it has reported or `timeout`
    /// has passed.
    pub fn wait(&mut self, timeout: Duration) -> Result<Option<Arc<[SearchMatch]>>, SearchError> {
        self.flush()?;
        let deadline = Instant::now() + timeout;
        while self.awaiting.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.result_rx.recv_timeout(remaining.min(WORKER_CHECK)) {
                Ok(result) => self.receive(result),
                Err(RecvTimeoutError::Timeout) => self.check_worker(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        Ok(self.take_fresh())
    }

    /// True while a query is waiting out its debounce or its scan is running.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.awaiting.is_some()
    }

    /// The latest published match set.
    pub fn published(&self) -> Arc<[SearchMatch]> {
        Arc::clone(&self.published)
    }

    /// The query the latest published set answers.
    pub fn published_query(&self) -> Option<&SearchQuery> {
        self.published_query.as_ref()
    }

    fn launch(&mut self, pending: Pending) -> Result<(), SearchError> {
        let Pending { query, epoch, .. } = pending;
        log::debug!("search #{epoch}: scanning {} documents for {:?} ({:?})", self.corpus.len(), query.term, query.mode);
        self.dispatch(ScanJob { epoch, query })?;
        self.awaiting = Some(epoch);
        Ok(())
    }

    fn dispatch(&mut self, mut job: ScanJob) -> Result<(), SearchError> {
        if let Some(worker) = &self.worker {
            match worker.jobs.send(job) {
                Ok(()) => return Ok(()),
                Err(SendError(returned)) => {
                    log::warn!("search worker has stopped, starting a new one");
                    job = returned;
                }
            }
        }
        let worker = self.spawn_worker()?;
        let sent = worker.jobs.send(job);
        self.worker = Some(worker);
        sent.map_err(|_| SearchError::WorkerUnavailable(io::Error::other("search worker exited at start")))
    }

    fn spawn_worker(&self) -> Result<Worker, SearchError> {
        let (jobs, job_rx) = mpsc::channel();
        let corpus = Arc::clone(&self.corpus);
        let source = Arc::clone(&self.source);
        let cache = self.cache.clone();
        let latest = Arc::clone(&self.latest);
        let results = self.result_tx.clone();

        let handle = thread::Builder::new()
            .name("docreader-search".to_string())
            .spawn(move || run_worker(&job_rx, &results, &latest, &corpus, source.as_ref(), &cache))
            .map_err(SearchError::WorkerUnavailable)?;
        Ok(Worker { jobs, handle })
    }

    fn drain(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            self.receive(result);
        }
    }

    /// Gives up on the awaited scan if the worker died before reporting it.
    fn check_worker(&mut self) {
        if self.awaiting.is_none() || !self.worker.as_ref().is_some_and(|w| w.handle.is_finished()) {
            return;
        }
        // It may have reported just before stopping.
        self.drain();
        if let Some(epoch) = self.awaiting.take() {
            log::error!("search #{epoch}: worker stopped before reporting, query abandoned");
        }
        self.worker = None;
    }

    fn receive(&mut self, result: ScanResult) {
        if self.awaiting != Some(result.epoch) {
            log::debug!("search #{}: dropping stale result (latest #{})", result.epoch, self.epoch);
            return;
        }
        self.awaiting = None;
        self.publish(result.query, result.matches);
    }

    fn publish(&mut self, query: SearchQuery, matches: Vec<SearchMatch>) {
        log::debug!("search #{}: publishing {} matches", self.epoch, matches.len());
        self.published = matches.into();
        self.published_query = Some(query);
        self.fresh = true;
    }

    fn take_fresh(&mut self) -> Option<Arc<[SearchMatch]>> {
        std::mem::take(&mut self.fresh).then(|| self.published())
    }
}

/// Worker loop: runs the newest queued job until the indexer goes away.
fn run_worker(
    jobs: &Receiver<ScanJob>,
    results: &Sender<ScanResult>,
    latest: &AtomicU64,
    corpus: &Corpus,
    source: &dyn ContentSource,
    cache: &ContentCache,
) {
    while let Ok(mut job) = jobs.recv() {
        while let Ok(newer) = jobs.try_recv() {
            log::debug!("search #{}: superseded before it started", job.epoch);
            job = newer;
        }
        let epoch = job.epoch;
        let live = || latest.load(Ordering::Acquire) == epoch;
        let Some(matches) = scan_while(corpus, &job.query.term, job.query.mode, cache, source, live)
        else {
            log::debug!("search #{epoch}: superseded mid-scan");
            continue;
        };
        let result = ScanResult {
            epoch,
            query: job.query,
            matches,
        };
        if results.send(result).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::DocumentId, search::MemorySource};
    use pretty_assertions::assert_eq;
    use relative_path::RelativePathBuf;
    use std::sync::Mutex;

    const WAIT: Duration = Duration::from_secs(5);

    fn indexer() -> SearchIndexer {
        let corpus = Corpus::from_paths(["guide.md", "notes.md"].map(RelativePathBuf::from));
        let source = MemorySource::new()
            .with("guide.md", "# Guide\nalpha beta\ngamma")
            .with("notes.md", "Beta notes\nmore text");
        SearchIndexer::new(corpus, source)
    }

    #[test]
    fn scan_waits_for_debounce() {
        let mut indexer = indexer();
        let start = Instant::now();
        indexer.set_query("beta", SearchMode::Content, start);

        assert_eq!(indexer.poll(start).unwrap(), None);
        assert!(indexer.is_busy());

        let published = indexer.wait(WAIT).unwrap().expect("published");
        assert_eq!(
            &published[..],
            &[
                SearchMatch::at_line(DocumentId(0), 1, "alpha beta"),
                SearchMatch::at_line(DocumentId(1), 0, "Beta notes"),
            ]
        );
        assert!(!indexer.is_busy());
    }

    #[test]
    fn due_query_launches_from_poll() {
        let mut indexer = indexer().with_debounce(Duration::ZERO);
        let now = Instant::now();
        indexer.set_query("notes", SearchMode::FileName, now);
        indexer.poll(now).unwrap();
        assert!(indexer.is_busy());

        let published = indexer.wait(WAIT).unwrap().expect("published");
        assert_eq!(&published[..], &[SearchMatch::title(DocumentId(1), "notes")]);
    }

    #[test]
    fn superseded_query_is_never_published() {
        let mut indexer = indexer();
        let now = Instant::now();
        indexer.set_query("alpha", SearchMode::Content, now);
        indexer.flush().unwrap();
        indexer.set_query("gamma", SearchMode::Content, now);
        indexer.flush().unwrap();

        let published = indexer.wait(WAIT).unwrap().expect("published");

        assert_eq!(indexer.published_query().unwrap().term, "gamma");
        assert_eq!(&published[..], &[SearchMatch::at_line(DocumentId(0), 2, "gamma")]);
    }

    #[test]
    fn identical_requery_keeps_only_latest_epoch() {
        let mut indexer = indexer();
        let now = Instant::now();
        for _ in 0..3 {
            indexer.set_query("beta", SearchMode::Content, now);
            indexer.flush().unwrap();
        }
        let published = indexer.wait(WAIT).unwrap().expect("published");
        assert_eq!(published.len(), 2);
        assert_eq!(indexer.wait(WAIT).unwrap(), None);
    }

    #[test]
    fn empty_query_publishes_empty_set_immediately() {
        let mut indexer = indexer();
        let now = Instant::now();
        indexer.set_query("beta", SearchMode::Content, now);
        indexer.set_query("", SearchMode::Content, now);

        assert!(!indexer.is_busy());
        let published = indexer.poll(now).unwrap().expect("published");
        assert!(published.is_empty());
    }

    #[test]
    fn poll_reports_each_publication_once() {
        let mut indexer = indexer();
        indexer.set_query("", SearchMode::FileName, Instant::now());
        assert!(indexer.poll(Instant::now()).unwrap().is_some());
        assert!(indexer.poll(Instant::now()).unwrap().is_none());
    }

    /// Holds the first read until the test releases it, recording every path
    /// read.
    struct GatedSource {
        started: Mutex<Sender<()>>,
        gate: Mutex<Receiver<()>>,
        reads: Arc<Mutex<Vec<String>>>,
    }

    impl ContentSource for GatedSource {
        fn read(&self, path: &RelativePath) -> Result<String, IoError> {
            let first = {
                let mut reads = self.reads.lock().unwrap();
                reads.push(path.to_string());
                reads.len() == 1
            };
            if first {
                self.started.lock().unwrap().send(()).unwrap();
                self.gate.lock().unwrap().recv().unwrap();
            }
            Ok("text".to_string())
        }
    }

    struct PanickingSource;

    impl ContentSource for PanickingSource {
        fn read(&self, path: &RelativePath) -> Result<String, IoError> {
            panic!("cannot read {path}");
        }
    }

    #[test]
    fn superseded_scan_stops_reading_the_corpus() {
        let (started_tx, started_rx) = mpsc::channel();
        let (gate_tx, gate_rx) = mpsc::channel();
        let reads = Arc::new(Mutex::new(Vec::new()));
        let source = GatedSource {
            started: Mutex::new(started_tx),
            gate: Mutex::new(gate_rx),
            reads: Arc::clone(&reads),
        };
        let corpus = Corpus::from_paths(["a.md", "b.md", "c.md"].map(RelativePathBuf::from));
        let mut indexer = SearchIndexer::new(corpus, source);
        let now = Instant::now();

        indexer.set_query("zzz", SearchMode::Content, now);
        indexer.flush().unwrap();
        started_rx.recv_timeout(WAIT).unwrap();

        indexer.set_query("b", SearchMode::FileName, now);
        indexer.flush().unwrap();
        gate_tx.send(()).unwrap();

        let published = indexer.wait(WAIT).unwrap().expect("published");
        assert_eq!(&published[..], &[SearchMatch::title(DocumentId(1), "b")]);
        assert_eq!(*reads.lock().unwrap(), vec!["a.md".to_string()]);
        assert!(!indexer.is_busy());
    }

    #[test]
    fn clearing_query_during_scan_is_not_busy() {
        let (started_tx, started_rx) = mpsc::channel();
        let (gate_tx, gate_rx) = mpsc::channel();
        let source = GatedSource {
            started: Mutex::new(started_tx),
            gate: Mutex::new(gate_rx),
            reads: Arc::default(),
        };
        let corpus = Corpus::from_paths(["a.md", "b.md"].map(RelativePathBuf::from));
        let mut indexer = SearchIndexer::new(corpus, source);
        let now = Instant::now();

        indexer.set_query("text", SearchMode::Content, now);
        indexer.flush().unwrap();
        started_rx.recv_timeout(WAIT).unwrap();
        indexer.set_query("", SearchMode::Content, now);

        assert!(!indexer.is_busy());
        assert!(indexer.poll(now).unwrap().expect("published").is_empty());
        gate_tx.send(()).unwrap();
    }

    #[test]
    fn dead_worker_does_not_leave_indexer_busy() {
        let corpus = Corpus::from_paths(["guide.md", "notes.md"].map(RelativePathBuf::from));
        let mut indexer = SearchIndexer::new(corpus, PanickingSource);
        let now = Instant::now();

        indexer.set_query("guide", SearchMode::Content, now);
        assert_eq!(indexer.wait(WAIT).unwrap(), None);
        assert!(!indexer.is_busy());

        // File-name scans never read content, so a fresh worker can answer.
        indexer.set_query("guide", SearchMode::FileName, now);
        let published = indexer.wait(WAIT).unwrap().expect("published");
        assert_eq!(&published[..], &[SearchMatch::title(DocumentId(0), "guide")]);
    }
}
