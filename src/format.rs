//! Corpus format probing and open options
//!
//! Decides which engine serves a path before anything is opened:
//! - a directory is a directory corpus of XML files
//! - `*.dact` / `*.dbxml` files are Dact (DBXML) containers
//! - `foo.index` next to `foo.data.dz` is a compact corpus, opened as either
//!   `foo` or `foo.index`

use crate::directory::DirectoryBackend;
use crate::error::{CorpusError, Result};
use crate::reader::Reader;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk corpus format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Directory,
    Dact,
    Compact,
}

impl Format {
    /// Probe `path`
    ///
    /// Fails with [`CorpusError::OpenFailed`] if the path cannot be inspected
    /// or does not look like any known corpus format.
    pub fn detect(path: &Path) -> Result<Format> {
        if has_compact_files(&compact_base(path)) {
            return Ok(Format::Compact);
        }

        let metadata = path
            .metadata()
            .map_err(|e| CorpusError::open_failed(path, e.to_string()))?;

        if metadata.is_dir() {
            return Ok(Format::Directory);
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("dact") | Some("dbxml") => Ok(Format::Dact),
            _ => Err(CorpusError::open_failed(path, "unrecognized corpus format")),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Directory => "directory",
            Format::Dact => "dact",
            Format::Compact => "compact",
        };
        f.write_str(name)
    }
}

/// `foo` for `foo.index`, otherwise the path itself
fn compact_base(path: &Path) -> PathBuf {
    match path.to_str().and_then(|text| text.strip_suffix(".index")) {
        Some(base) => PathBuf::from(base),
        None => path.to_path_buf(),
    }
}

fn has_compact_files(base: &Path) -> bool {
    with_suffix(base, ".index").is_file() && with_suffix(base, ".data.dz").is_file()
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Which engine opens a corpus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Probe the path and pick an engine for its format
    #[default]
    Auto,
    /// Always use the built-in directory engine
    Directory,
    /// Always use libalpino_corpus (requires the `native` feature)
    Native,
}

/// Options for opening a corpus
///
/// # Examples
///
/// ```no_run
/// use alpinocorpus::{BackendKind, OpenOptions};
///
/// let reader = OpenOptions::new()
///     .backend(BackendKind::Directory)
///     .recursive(false)
///     .open("treebank/")?;
/// # Ok::<(), alpinocorpus::CorpusError>(())
/// ```
#[derive(Debug, Clone)]
pub struct OpenOptions {
    backend: BackendKind,
    recursive: bool,
    compressed: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenOptions {
    pub fn new() -> Self {
        Self {
            backend: BackendKind::Auto,
            recursive: true,
            compressed: true,
        }
    }

    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Directory corpora: descend into subdirectories
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Directory corpora: include `*.xml.gz` entries
    pub fn compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    /// Open the corpus at `path`
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Reader> {
        let path = path.as_ref();
        let kind = match self.backend {
            BackendKind::Auto => {
                let format = Format::detect(path)?;
                debug!(path = %path.display(), %format, "detected corpus format");
                match format {
                    Format::Directory => BackendKind::Directory,
                    Format::Dact | Format::Compact => BackendKind::Native,
                }
            }
            kind => kind,
        };

        match kind {
            BackendKind::Directory => Reader::with_backend(&self.directory_backend(), path),
            _ => open_native(path),
        }
    }

    fn directory_backend(&self) -> DirectoryBackend {
        DirectoryBackend::new()
            .recursive(self.recursive)
            .compressed(self.compressed)
    }
}

#[cfg(feature = "native")]
fn open_native(path: &Path) -> Result<Reader> {
    Reader::with_backend(&crate::native::NativeBackend, path)
}

#[cfg(not(feature = "native"))]
fn open_native(path: &Path) -> Result<Reader> {
    Err(CorpusError::open_failed(
        path,
        "this format needs the native engine (build with the `native` feature)",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_detect_directory() {
        let dir = tempdir().unwrap();
        assert_eq!(Format::detect(dir.path()).unwrap(), Format::Directory);
    }

    #[test]
    fn test_detect_dact_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cdb.dact");
        fs::write(&path, b"").unwrap();

        assert_eq!(Format::detect(&path).unwrap(), Format::Dact);
    }

    #[test]
    fn test_detect_compact() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("cdb.index"), b"").unwrap();
        fs::write(dir.path().join("cdb.data.dz"), b"").unwrap();

        assert_eq!(Format::detect(&dir.path().join("cdb")).unwrap(), Format::Compact);
        assert_eq!(
            Format::detect(&dir.path().join("cdb.index")).unwrap(),
            Format::Compact
        );
    }

    #[test]
    fn test_index_without_data_is_not_compact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cdb.index");
        fs::write(&path, b"").unwrap();

        assert!(matches!(
            Format::detect(&path),
            Err(CorpusError::OpenFailed { .. })
        ));
    }

    #[test]
    fn test_detect_missing_and_unknown() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.dact");
        assert!(matches!(
            Format::detect(&missing),
            Err(CorpusError::OpenFailed { .. })
        ));

        let text = dir.path().join("notes.txt");
        fs::write(&text, b"hello").unwrap();
        match Format::detect(&text) {
            Err(CorpusError::OpenFailed { path, reason }) => {
                assert_eq!(path, text);
                assert_eq!(reason, "unrecognized corpus format");
            }
            other => panic!("expected OpenFailed, got {:?}", other),
        }
    }

    #[cfg(not(feature = "native"))]
    #[test]
    fn test_native_formats_need_feature() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cdb.dact");
        fs::write(&path, b"").unwrap();

        match OpenOptions::new().open(&path) {
            Err(CorpusError::OpenFailed { reason, .. }) => assert!(reason.contains("native")),
            other => panic!("expected OpenFailed, got {:?}", other.map(|r| r.is_open())),
        }
    }

    #[test]
    fn test_forced_directory_backend_rejects_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.xml");
        fs::write(&path, b"<a/>").unwrap();

        let result = OpenOptions::new().backend(BackendKind::Directory).open(&path);
        assert!(matches!(result, Err(CorpusError::OpenFailed { .. })));
    }
}
