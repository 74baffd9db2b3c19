//! Corpus readers and queries
//!
//! A [`Reader`] owns one open engine session. Every operation checks that
//! the session is still open before touching the engine, so a closed reader
//! fails with [`CorpusError::ClosedReader`] instead of reaching a freed
//! handle. A [`Query`] borrows its reader and performs the same check each
//! time it runs.

use crate::engine::{Backend, Corpus};
use crate::error::{CorpusError, Result};
use crate::format::OpenOptions;
use crate::iterators::EntryIter;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An open corpus
///
/// # Examples
///
/// ```no_run
/// use alpinocorpus::Reader;
///
/// let mut reader = Reader::open("cdb.dact")?;
/// for name in reader.entries()? {
///     let xml = reader.read(&name)?;
///     println!("{}: {} bytes", name, xml.len());
/// }
///
/// let query = reader.query("//node[@cat='np']");
/// let hits = query.entries()?.count();
/// println!("{} hits", hits);
///
/// reader.close();
/// # Ok::<(), alpinocorpus::CorpusError>(())
/// ```
pub struct Reader {
    path: PathBuf,
    corpus: Option<Box<dyn Corpus>>,
}

impl Reader {
    /// Open the corpus at `path`, detecting its format
    ///
    /// Same as `OpenOptions::new().open(path)`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        OpenOptions::new().open(path)
    }

    /// Open `path` through a specific engine
    pub fn with_backend(backend: &dyn Backend, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let corpus = backend.open_corpus(path).ok_or_else(|| {
            CorpusError::open_failed(
                path,
                format!("{} engine could not open it", backend.name()),
            )
        })?;
        debug!(path = %path.display(), backend = backend.name(), "opened corpus");
        Ok(Self {
            path: path.to_path_buf(),
            corpus: Some(corpus),
        })
    }

    /// Release the engine session
    ///
    /// Closing an already closed reader does nothing.
    pub fn close(&mut self) -> &mut Self {
        if self.corpus.take().is_some() {
            debug!(path = %self.path.display(), "closed corpus");
        }
        self
    }

    pub fn is_open(&self) -> bool {
        self.corpus.is_some()
    }

    /// Path the reader was opened with
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the engine serving this reader, `None` once closed
    pub fn backend(&self) -> Option<&'static str> {
        self.corpus.as_ref().map(|corpus| corpus.backend())
    }

    fn corpus(&self) -> Result<&dyn Corpus> {
        self.corpus
            .as_deref()
            .ok_or_else(|| CorpusError::ClosedReader {
                path: self.path.clone(),
            })
    }

    /// Enumerate every entry name, in the engine's order
    pub fn entries(&self) -> Result<EntryIter<'_>> {
        let cursor = self
            .corpus()?
            .entry_iter()
            .ok_or(CorpusError::EntryIterationFailed)?;
        Ok(EntryIter::new(cursor))
    }

    /// Full content of the entry `name`
    pub fn read(&self, name: &str) -> Result<String> {
        self.corpus()?
            .read_entry(name)
            .ok_or_else(|| CorpusError::EntryNotFound {
                name: name.to_string(),
            })
    }

    /// Bind `text` to this reader without running or validating it
    pub fn query(&self, text: impl Into<String>) -> Query<'_> {
        Query {
            reader: self,
            text: text.into(),
        }
    }

    /// Ask the engine whether `text` is an acceptable query
    pub fn valid_query(&self, text: &str) -> Result<bool> {
        Ok(self.corpus()?.is_valid_query(text))
    }
}

impl Drop for Reader {
    fn drop(&mut self) {
        if self.corpus.is_some() {
            warn!(path = %self.path.display(), "reader dropped while open; closing");
            self.close();
        }
    }
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("path", &self.path)
            .field("backend", &self.backend())
            .finish()
    }
}

/// A query bound to a reader
///
/// Running it does not consume it: every call to [`Query::entries`]
/// executes the query again and returns an independent iterator.
#[derive(Clone)]
pub struct Query<'r> {
    reader: &'r Reader,
    text: String,
}

impl<'r> Query<'r> {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Execute the query and iterate over matching entry names
    ///
    /// Validity is not checked first; an engine that rejects the query
    /// makes this fail with [`CorpusError::QueryExecutionFailed`].
    pub fn entries(&self) -> Result<EntryIter<'r>> {
        let cursor = self
            .reader
            .corpus()?
            .query_iter(&self.text)
            .ok_or_else(|| CorpusError::QueryExecutionFailed {
                query: self.text.clone(),
            })?;
        Ok(EntryIter::new(cursor))
    }

    pub fn is_valid(&self) -> Result<bool> {
        self.reader.valid_query(&self.text)
    }
}

impl fmt::Debug for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("reader", &self.reader.path)
            .field("text", &self.text)
            .finish()
    }
}
