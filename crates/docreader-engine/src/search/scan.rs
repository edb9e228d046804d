use crate::{document::split_lines, models::Corpus};

use super::{ContentCache, ContentSource, SearchMatch, SearchMode};

/// Scans `corpus` for `term`, case-insensitively.
///
/// File-name mode yields one title match per document whose display name
/// contains the term. Content mode additionally yields every matching line,
/// in line order, with the trimmed line as snippet; a document's title match
/// comes before its line matches. Unreadable documents are skipped. If no
/// document could be read at all the result is empty.
pub fn scan(
    corpus: &Corpus,
    term: &str,
    mode: SearchMode,
    cache: &ContentCache,
    source: &dyn ContentSource,
) -> Vec<SearchMatch> {
    scan_while(corpus, term, mode, cache, source, || true).unwrap_or_default()
}

/// Like [`scan`], but checks `live` before each document and gives up with
/// `None` once it returns false.
pub(super) fn scan_while(
    corpus: &Corpus,
    term: &str,
    mode: SearchMode,
    cache: &ContentCache,
    source: &dyn ContentSource,
    live: impl Fn() -> bool,
) -> Option<Vec<SearchMatch>> {
    if term.is_empty() {
        return Some(Vec::new());
    }
    let needle = term.to_lowercase();
    let mut matches = Vec::new();
    let mut read = 0usize;
    let mut failed = 0usize;

    for entry in corpus.entries() {
        if !live() {
            return None;
        }
        if entry.display_name().to_lowercase().contains(&needle) {
            matches.push(SearchMatch::title(entry.id(), entry.display_name()));
        }
        if mode == SearchMode::FileName {
            continue;
        }

        let content = match cache.get_or_load(entry.relative_path(), source) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("skipping {} in content search: {e}", entry.relative_path());
                failed += 1;
                continue;
            }
        };
        read += 1;

        for (index, line) in split_lines(&content).enumerate() {
            if line.to_lowercase().contains(&needle) {
                matches.push(SearchMatch::at_line(entry.id(), index, line.trim()));
            }
        }
    }

    if mode == SearchMode::Content && read == 0 && failed > 0 {
        log::error!("content search for {term:?}: no documents could be read ({failed} failed)");
        return Some(Vec::new());
    }
    Some(matches)
}
