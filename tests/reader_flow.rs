//! End-to-end reader behaviour on real corpora on disk

use alpinocorpus::memory::MemoryBackend;
use alpinocorpus::{BackendKind, CorpusError, OpenOptions, Reader};
use std::collections::BTreeSet;
use std::fs;
use tempfile::{TempDir, tempdir};

const A_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<alpino_ds version="1.3">
  <node begin="0" cat="top" end="2" id="0" rel="top">
    <node begin="0" end="1" id="1" lemma="de" pos="det" rel="det" word="De"/>
    <node begin="1" end="2" id="2" lemma="hond" pos="noun" rel="hd" word="hond"/>
  </node>
  <sentence>De hond</sentence>
</alpino_ds>
"#;

/// Helper to create a directory corpus with entries a, b and c
fn abc_corpus() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.xml"), A_XML).unwrap();
    fs::write(dir.path().join("b.xml"), "<alpino_ds id=\"b\"/>").unwrap();
    fs::write(dir.path().join("c.xml"), "<alpino_ds id=\"c\"/>").unwrap();
    dir
}

fn as_set<I: IntoIterator<Item = String>>(names: I) -> BTreeSet<String> {
    names.into_iter().collect()
}

#[test]
fn test_directory_corpus_end_to_end() {
    let dir = abc_corpus();
    let reader = Reader::open(dir.path()).unwrap();

    assert!(reader.is_open());
    assert_eq!(reader.backend(), Some("directory"));

    let names = as_set(reader.entries().unwrap());
    let expected: BTreeSet<String> = ["a.xml", "b.xml", "c.xml"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, expected);

    assert_eq!(reader.read("a.xml").unwrap(), A_XML);
    assert!(matches!(
        reader.read("z.xml"),
        Err(CorpusError::EntryNotFound { .. })
    ));

    for name in reader.entries().unwrap() {
        assert!(!reader.read(&name).unwrap().is_empty());
    }
}

#[test]
fn test_memory_corpus_end_to_end() {
    let backend = MemoryBackend::new("fixture")
        .with_entry("a", A_XML)
        .with_entry("b", "<alpino_ds id=\"b\"/>")
        .with_entry("c", "<alpino_ds id=\"c\"/>")
        .with_query("//node[@lemma='hond']", ["a"]);
    let reader = Reader::with_backend(&backend, "fixture").unwrap();

    let names = as_set(reader.entries().unwrap());
    assert_eq!(names, as_set(["a", "b", "c"].map(String::from)));
    assert_eq!(reader.read("a").unwrap(), A_XML);
    assert!(matches!(
        reader.read("z"),
        Err(CorpusError::EntryNotFound { .. })
    ));

    let query = reader.query("//node[@lemma='hond']");
    assert!(query.is_valid().unwrap());
    let first = as_set(query.entries().unwrap());
    let second = as_set(query.entries().unwrap());
    assert_eq!(first, second);
    assert_eq!(first, as_set(["a".to_string()]));

    assert!(!reader.valid_query("//node[@lemma=").unwrap());
}

#[test]
fn test_invalid_paths_fail_to_open() {
    let dir = tempdir().unwrap();
    let text = dir.path().join("notes.txt");
    fs::write(&text, "not a corpus").unwrap();

    for path in [dir.path().join("missing"), text] {
        match Reader::open(&path) {
            Err(CorpusError::OpenFailed { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected OpenFailed, got {:?}", other),
        }
    }
}

#[test]
fn test_closed_reader() {
    let dir = abc_corpus();
    let mut reader = Reader::open(dir.path()).unwrap();

    assert!(!reader.close().is_open());
    reader.close();

    assert!(matches!(
        reader.entries(),
        Err(CorpusError::ClosedReader { .. })
    ));
    assert!(matches!(
        reader.read("a.xml"),
        Err(CorpusError::ClosedReader { .. })
    ));
    assert!(matches!(
        reader.query("//node").entries(),
        Err(CorpusError::ClosedReader { .. })
    ));
    assert!(matches!(
        reader.valid_query("//node"),
        Err(CorpusError::ClosedReader { .. })
    ));
}

#[test]
fn test_directory_corpus_rejects_queries() {
    let dir = abc_corpus();
    let reader = Reader::open(dir.path()).unwrap();

    assert!(!reader.valid_query("//node[@cat='np']").unwrap());
    assert!(matches!(
        reader.query("//node[@cat='np']").entries(),
        Err(CorpusError::QueryExecutionFailed { .. })
    ));
}

#[test]
fn test_open_options() {
    let dir = abc_corpus();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested/d.xml"), "<alpino_ds id=\"d\"/>").unwrap();

    let reader = OpenOptions::new()
        .backend(BackendKind::Directory)
        .recursive(false)
        .open(dir.path())
        .unwrap();
    assert_eq!(reader.entries().unwrap().count(), 3);

    let reader = OpenOptions::new().open(dir.path()).unwrap();
    let names = as_set(reader.entries().unwrap());
    assert!(names.contains("nested/d.xml"));
    assert_eq!(names.len(), 4);
}

#[test]
fn test_peek_and_advance_protocol() {
    let dir = abc_corpus();
    let reader = Reader::open(dir.path()).unwrap();
    let mut entries = reader.entries().unwrap();

    let mut seen = Vec::new();
    while let Some(name) = entries.peek() {
        seen.push(name.to_string());
        if !entries.advance() {
            break;
        }
    }

    assert_eq!(seen.len(), 3);
    assert!(!entries.is_live());
}
