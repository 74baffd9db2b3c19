//! Directory corpus engine
//!
//! Serves a plain directory of XML files, one entry per file. Entry names
//! are paths relative to the corpus root, always with `/` separators.
//! Gzip-compressed entries (`*.xml.gz`) are listed under their uncompressed
//! name and decompressed on read.
//!
//! This engine does not evaluate queries.

use crate::engine::{Backend, Corpus, Cursor};
use flate2::read::GzDecoder;
use glob::{MatchOptions, Pattern};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Engine for directories of `*.xml` files
#[derive(Debug, Clone)]
pub struct DirectoryBackend {
    recursive: bool,
    compressed: bool,
}

impl Default for DirectoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryBackend {
    pub fn new() -> Self {
        Self {
            recursive: true,
            compressed: true,
        }
    }

    /// Descend into subdirectories (default: true)
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Also list `*.xml.gz` files (default: true)
    pub fn compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    fn scan(&self, root: &Path) -> Option<DirectoryCorpus> {
        let base = Pattern::escape(root.to_str()?);
        let depth = if self.recursive { "**/" } else { "" };
        let mut suffixes = vec![".xml"];
        if self.compressed {
            suffixes.push(".xml.gz");
        }

        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };

        let mut files: FxHashMap<String, EntryFile> = FxHashMap::default();
        for suffix in suffixes {
            let pattern = format!("{}/{}*{}", base, depth, suffix);
            let paths = match glob::glob_with(&pattern, options) {
                Ok(paths) => paths,
                Err(e) => {
                    warn!(%pattern, error = %e, "invalid directory pattern");
                    return None;
                }
            };
            for entry in paths {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        warn!(path = %e.path().display(), error = %e.error(), "skipping unreadable path");
                        continue;
                    }
                };
                if !path.is_file() {
                    continue;
                }
                let Some(name) = entry_name(root, &path) else {
                    warn!(root = %root.display(), path = %path.display(), "file outside corpus root");
                    return None;
                };
                let file = if suffix == ".xml" {
                    EntryFile::Plain(path)
                } else {
                    EntryFile::Gzip(path)
                };
                // Plain files are scanned first and win over a gzip twin.
                if files.contains_key(&name) {
                    debug!(%name, "ignoring compressed duplicate");
                    continue;
                }
                files.insert(name, file);
            }
        }

        let mut names: Vec<String> = files.keys().cloned().collect();
        names.sort();
        Some(DirectoryCorpus { names, files })
    }
}

impl Backend for DirectoryBackend {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn open_corpus(&self, path: &Path) -> Option<Box<dyn Corpus>> {
        if !path.is_dir() {
            return None;
        }
        // glob drops leading `./`, so names are taken relative to the resolved root.
        let root = match path.canonicalize() {
            Ok(root) => root,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot resolve corpus root");
                return None;
            }
        };
        let corpus = self.scan(&root)?;
        debug!(path = %path.display(), entries = corpus.names.len(), "scanned directory corpus");
        Some(Box::new(corpus))
    }
}

/// Root-relative name with `/` separators and without a `.gz` suffix
fn entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative.iter().map(|part| part.to_str()).collect();
    let name = parts?.join("/");
    Some(match name.strip_suffix(".gz") {
        Some(stripped) => stripped.to_string(),
        None => name,
    })
}

#[derive(Debug)]
enum EntryFile {
    Plain(PathBuf),
    Gzip(PathBuf),
}

impl EntryFile {
    fn read(&self) -> std::io::Result<String> {
        let mut content = String::new();
        match self {
            EntryFile::Plain(path) => {
                File::open(path)?.read_to_string(&mut content)?;
            }
            EntryFile::Gzip(path) => {
                GzDecoder::new(File::open(path)?).read_to_string(&mut content)?;
            }
        }
        Ok(content)
    }
}

struct DirectoryCorpus {
    names: Vec<String>,
    files: FxHashMap<String, EntryFile>,
}

impl Corpus for DirectoryCorpus {
    fn backend(&self) -> &'static str {
        "directory"
    }

    fn read_entry(&self, name: &str) -> Option<String> {
        let file = self.files.get(name)?;
        match file.read() {
            Ok(content) => Some(content),
            Err(e) => {
                debug!(%name, error = %e, "failed to read entry");
                None
            }
        }
    }

    fn entry_iter(&self) -> Option<Box<dyn Cursor + '_>> {
        Some(Box::new(NameCursor {
            names: &self.names,
            pos: 0,
        }))
    }

    fn query_iter(&self, query: &str) -> Option<Box<dyn Cursor + '_>> {
        warn!(%query, "directory corpora do not support queries");
        None
    }

    fn is_valid_query(&self, _query: &str) -> bool {
        false
    }
}

struct NameCursor<'c> {
    names: &'c [String],
    pos: usize,
}

impl Cursor for NameCursor<'_> {
    fn value(&self) -> Option<String> {
        self.names.get(self.pos).cloned()
    }

    fn advance(&mut self) -> bool {
        self.pos += 1;
        self.pos < self.names.len()
    }
}
