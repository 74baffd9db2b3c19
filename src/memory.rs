//! In-memory corpus engine
//!
//! Holds entries and canned query results in memory and counts every session
//! and cursor it hands out. Useful for embedding small corpora and for
//! checking that callers release what they acquire.

use crate::engine::{Backend, Corpus, Cursor};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Resource counters shared by a backend and everything it opened
#[derive(Debug, Default)]
pub struct EngineStats {
    sessions_opened: AtomicUsize,
    sessions_closed: AtomicUsize,
    cursors_created: AtomicUsize,
    cursors_destroyed: AtomicUsize,
}

impl EngineStats {
    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> usize {
        self.sessions_closed.load(Ordering::SeqCst)
    }

    pub fn live_sessions(&self) -> usize {
        self.sessions_opened() - self.sessions_closed()
    }

    pub fn cursors_created(&self) -> usize {
        self.cursors_created.load(Ordering::SeqCst)
    }

    pub fn cursors_destroyed(&self) -> usize {
        self.cursors_destroyed.load(Ordering::SeqCst)
    }

    pub fn live_cursors(&self) -> usize {
        self.cursors_created() - self.cursors_destroyed()
    }
}

#[derive(Debug, Clone)]
enum CannedQuery {
    Matches(Vec<String>),
    FailsOnExecute,
}

#[derive(Debug, Default, Clone)]
struct Contents {
    names: Vec<String>,
    entries: FxHashMap<String, String>,
    queries: FxHashMap<String, CannedQuery>,
}

/// Engine serving one in-memory corpus
///
/// The corpus answers to a single path, given to [`MemoryBackend::new`].
/// Entries enumerate in insertion order. Queries are not evaluated: only
/// registered query strings are valid, and they return their registered
/// results.
///
/// # Examples
///
/// ```
/// use alpinocorpus::Reader;
/// use alpinocorpus::memory::MemoryBackend;
///
/// let backend = MemoryBackend::new("mem:test")
///     .with_entry("a", "<alpino_ds/>")
///     .with_query("//node", ["a"]);
/// let reader = Reader::with_backend(&backend, "mem:test")?;
/// let hits: Vec<_> = reader.query("//node").entries()?.collect();
/// assert_eq!(hits, vec!["a"]);
/// # Ok::<(), alpinocorpus::CorpusError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    path: PathBuf,
    contents: Arc<Contents>,
    stats: Arc<EngineStats>,
}

impl MemoryBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            contents: Arc::new(Contents::default()),
            stats: Arc::new(EngineStats::default()),
        }
    }

    fn contents_mut(&mut self) -> &mut Contents {
        Arc::make_mut(&mut self.contents)
    }

    /// Add an entry, replacing the content of an existing one
    pub fn with_entry(mut self, name: &str, content: &str) -> Self {
        let contents = self.contents_mut();
        if contents
            .entries
            .insert(name.to_string(), content.to_string())
            .is_none()
        {
            contents.names.push(name.to_string());
        }
        self
    }

    /// Register a valid query and the entry names it yields
    pub fn with_query<I, S>(mut self, query: &str, results: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let results = results.into_iter().map(Into::into).collect();
        self.contents_mut()
            .queries
            .insert(query.to_string(), CannedQuery::Matches(results));
        self
    }

    /// Register a query that passes validation but fails when executed
    pub fn with_failing_query(mut self, query: &str) -> Self {
        self.contents_mut()
            .queries
            .insert(query.to_string(), CannedQuery::FailsOnExecute);
        self
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }
}

impl Backend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn open_corpus(&self, path: &Path) -> Option<Box<dyn Corpus>> {
        if path != self.path.as_path() {
            return None;
        }
        self.stats.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Some(Box::new(MemoryCorpus {
            contents: Arc::clone(&self.contents),
            stats: Arc::clone(&self.stats),
        }))
    }
}

struct MemoryCorpus {
    contents: Arc<Contents>,
    stats: Arc<EngineStats>,
}

impl MemoryCorpus {
    fn cursor(&self, items: &[String]) -> Box<dyn Cursor + '_> {
        self.stats.cursors_created.fetch_add(1, Ordering::SeqCst);
        Box::new(MemoryCursor {
            items: items.to_vec(),
            pos: 0,
            stats: &self.stats,
        })
    }
}

impl Corpus for MemoryCorpus {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn read_entry(&self, name: &str) -> Option<String> {
        self.contents.entries.get(name).cloned()
    }

    fn entry_iter(&self) -> Option<Box<dyn Cursor + '_>> {
        Some(self.cursor(&self.contents.names))
    }

    fn query_iter(&self, query: &str) -> Option<Box<dyn Cursor + '_>> {
        match self.contents.queries.get(query)? {
            CannedQuery::Matches(results) => Some(self.cursor(results)),
            CannedQuery::FailsOnExecute => None,
        }
    }

    fn is_valid_query(&self, query: &str) -> bool {
        self.contents.queries.contains_key(query)
    }
}

impl Drop for MemoryCorpus {
    fn drop(&mut self) {
        self.stats.sessions_closed.fetch_add(1, Ordering::SeqCst);
    }
}

struct MemoryCursor<'c> {
    items: Vec<String>,
    pos: usize,
    stats: &'c EngineStats,
}

impl Cursor for MemoryCursor<'_> {
    fn value(&self) -> Option<String> {
        self.items.get(self.pos).cloned()
    }

    fn advance(&mut self) -> bool {
        self.pos += 1;
        self.pos < self.items.len()
    }
}

impl Drop for MemoryCursor<'_> {
    fn drop(&mut self) {
        self.stats.cursors_destroyed.fetch_add(1, Ordering::SeqCst);
    }
}
