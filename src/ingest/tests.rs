use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use super::*;
use crate::embedding::{MockEmbeddingProvider, StubEmbeddings};
use crate::vectordb::MockVectorIndex;

const COLLECTION: &str = "ingest_test";

fn source_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.md"), "Beta document about shipping.").unwrap();
    fs::write(dir.path().join("a.txt"), "Alpha document about refunds.").unwrap();
    fs::write(dir.path().join("notes.log"), "ignored").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("c.MD"), "Gamma, nested.").unwrap();
    dir
}

#[test]
fn test_chunk_text_short_input_is_single_chunk() {
    assert_eq!(chunk_text("  hello world  ", 100, 10), vec!["hello world"]);
    assert!(chunk_text("   \n\t ", 100, 10).is_empty());
    assert!(chunk_text("", 100, 10).is_empty());
}

#[test]
fn test_chunk_text_breaks_on_whitespace() {
    let chunks = chunk_text("aaaa bbbb cccc dddd", 10, 0);
    assert_eq!(chunks, vec!["aaaa bbbb", "cccc dddd"]);
    assert!(chunks.iter().all(|c| c.chars().count() <= 10));
}

#[test]
fn test_chunk_text_hard_split_without_whitespace() {
    let chunks = chunk_text("abcdefghij", 4, 0);
    assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
}

#[test]
fn test_chunk_text_overlap() {
    let chunks = chunk_text("abcdefghij", 4, 2);
    assert_eq!(chunks, vec!["abcd", "cdef", "efgh", "ghij"]);
}

#[test]
fn test_chunk_text_respects_char_boundaries() {
    let text = "äöü€".repeat(10);
    let chunks = chunk_text(&text, 7, 1);
    assert!(chunks.iter().all(|c| c.chars().count() <= 7));
    assert_eq!(chunks.first().map(|c| c.chars().take(4).collect::<String>()), Some("äöü€".to_string()));
}

#[test]
fn test_chunk_text_degenerate_sizes_terminate() {
    assert_eq!(chunk_text("abc", 0, 5), vec!["a", "b", "c"]);
    assert_eq!(chunk_text("abcd", 2, 9), vec!["ab", "bc", "cd"]);
}

#[test]
fn test_matches_extension() {
    let exts = ["pdf", "md"];
    assert!(matches_extension(Path::new("x/report.PDF"), &exts));
    assert!(matches_extension(Path::new("readme.md"), &exts));
    assert!(!matches_extension(Path::new("readme"), &exts));
    assert!(!matches_extension(Path::new("a.txt"), &exts));
}

#[test]
fn test_discover_documents_recursive_sorted() {
    let dir = source_tree();
    let found = discover_documents(dir.path(), &["txt", "md"]).unwrap();

    let names: Vec<_> = found
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 3);
    assert_eq!(names[0], "a.txt");
    assert_eq!(names[1], "b.md");
    assert!(names[2].ends_with("c.MD"));
}

#[test]
fn test_discover_documents_missing_dir() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        discover_documents(&missing, &["md"]),
        Err(IngestError::SourceNotFound { .. })
    ));
}

#[tokio::test]
async fn test_index_directory_upserts_chunks() {
    let dir = source_tree();
    fs::write(dir.path().join("empty.md"), "   ").unwrap();
    fs::write(dir.path().join("binary.txt"), [0xff, 0xfe, 0x00, 0x81]).unwrap();

    let index = Arc::new(MockVectorIndex::new());
    let indexer = Indexer::new(Arc::new(StubEmbeddings::new(8)), index.clone())
        .with_collection(COLLECTION)
        .with_batch_size(1);

    let report = indexer
        .index_directory(dir.path(), &["txt", "md"])
        .await
        .unwrap();

    assert_eq!(
        report,
        IngestReport {
            files: 3,
            chunks: 3,
            skipped: 2
        }
    );
    assert_eq!(index.point_count(COLLECTION), Some(3));

    let hits = index.search(COLLECTION, vec![1.0; 8], 10).await.unwrap();
    assert!(hits.iter().any(|h| h.file_name.as_deref() == Some("a.txt")));
}

#[tokio::test]
async fn test_index_directory_is_idempotent() {
    let dir = source_tree();
    let index = Arc::new(MockVectorIndex::new());
    let indexer =
        Indexer::new(Arc::new(StubEmbeddings::new(8)), index.clone()).with_collection(COLLECTION);

    indexer.index_directory(dir.path(), &["md"]).await.unwrap();
    indexer.index_directory(dir.path(), &["md"]).await.unwrap();

    assert_eq!(index.point_count(COLLECTION), Some(2));
}

#[tokio::test]
async fn test_index_directory_embedding_failure() {
    let dir = source_tree();
    let provider = Arc::new(MockEmbeddingProvider::new());
    provider.set_failing(true);

    let indexer =
        Indexer::new(provider, Arc::new(MockVectorIndex::new())).with_collection(COLLECTION);
    assert!(matches!(
        indexer.index_directory(dir.path(), &["md"]).await,
        Err(IngestError::Embedding { .. })
    ));
}
