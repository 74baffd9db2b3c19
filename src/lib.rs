//! Alpinocorpus: safe access to Alpino treebank corpora
//!
//! Opens Dact (DBXML) files, compact corpora and plain directories of XML
//! files behind one reader interface, with lazy iteration over entry names
//! and query execution. Corpus engines sit behind the traits in [`engine`].

// Core modules
pub mod directory; // Built-in engine for directories of XML files
pub mod engine; // Engine boundary: backends, sessions, cursors
pub mod error;
pub mod format; // Format probing and open options
pub mod iterators; // Shared entry iteration protocol
pub mod memory; // Instrumented in-memory engine
pub mod reader; // Reader and Query

// Binding to libalpino_corpus
#[cfg(feature = "native")]
pub mod native;

// Python bindings
#[cfg(feature = "pyo3")]
pub mod python;

// Re-exports for convenience
pub use error::{CorpusError, Result};
pub use format::{BackendKind, Format, OpenOptions};
pub use iterators::EntryIter;
pub use reader::{Query, Reader};
