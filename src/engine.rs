//! Boundary to corpus engines
//!
//! An engine does the real work: recognizing a corpus on disk, reading
//! entries and evaluating queries. The reader layer only talks to it through
//! these three traits:
//!
//! - [`Backend`] opens a path and hands back a session
//! - [`Corpus`] is one open session; dropping it closes the corpus
//! - [`Cursor`] is one engine-side iterator; dropping it destroys the iterator
//!
//! Because a cursor borrows the session that produced it, a session can never
//! be closed while one of its iterators is still alive.

use std::path::Path;

/// A corpus engine that can open sessions
pub trait Backend {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Open the corpus at `path`, or `None` if the engine cannot.
    fn open_corpus(&self, path: &Path) -> Option<Box<dyn Corpus>>;
}

/// An open corpus session
///
/// The session is released when the box is dropped, which happens exactly
/// once per successful [`Backend::open_corpus`].
pub trait Corpus {
    /// Name of the engine serving this session
    fn backend(&self) -> &'static str;

    /// Full content of one entry, `None` if it does not exist or cannot be read.
    fn read_entry(&self, name: &str) -> Option<String>;

    /// Start enumerating every entry.
    fn entry_iter(&self) -> Option<Box<dyn Cursor + '_>>;

    /// Start executing `query`. `None` when the engine rejects it.
    fn query_iter(&self, query: &str) -> Option<Box<dyn Cursor + '_>>;

    /// Advisory check; never executes the query.
    fn is_valid_query(&self, query: &str) -> bool;
}

/// Forward-only engine iterator over entry names
///
/// A fresh cursor is positioned on its first value, if any.
pub trait Cursor {
    /// Value under the cursor, `None` once there is none.
    fn value(&self) -> Option<String>;

    /// Move to the next value; returns whether there is one.
    fn advance(&mut self) -> bool;
}
