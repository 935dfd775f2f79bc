//! Shared harness for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use ragsense::{
    ChatPipeline, HandlerState, IntentClassifier, MockEmbeddingProvider, MockQueryEngine,
    QueryResponse, SourceNode, create_router_with_state,
};
use ragsense::vectordb::PAYLOAD_FILE_NAME;

pub fn node(file_name: &str) -> SourceNode {
    SourceNode::new("chunk", 0.8).with_metadata(PAYLOAD_FILE_NAME, file_name)
}

/// Writes `files` (relative path, contents) under `dir`, creating parents.
pub fn write_files(dir: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }
}

pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
    pub embeddings: Arc<MockEmbeddingProvider>,
    pub classifier: Arc<IntentClassifier>,
    pub engine: Arc<MockQueryEngine>,
    pub cache_dir: TempDir,
    pub source_dir: TempDir,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serves a pipeline backed by mocks on an ephemeral port.
pub async fn spawn_test_server(load_classifier: bool) -> anyhow::Result<TestServer> {
    let cache_dir = TempDir::new()?;
    let source_dir = TempDir::new()?;
    write_files(
        source_dir.path(),
        &[("travel.pdf", "%PDF"), ("hr/leave.pdf", "%PDF")],
    );

    let embeddings = Arc::new(MockEmbeddingProvider::new());
    let classifier = Arc::new(IntentClassifier::new(
        embeddings.clone(),
        cache_dir.path(),
    ));
    if load_classifier {
        classifier.ensure_reference_embeddings_loaded().await?;
    }

    let engine = Arc::new(MockQueryEngine::with_response(QueryResponse::new(
        "Book travel through the portal.",
        vec![node("travel.pdf")],
    )));

    let pipeline = ChatPipeline::new(classifier.clone(), engine.clone(), source_dir.path());
    let app = create_router_with_state(HandlerState::new(Arc::new(pipeline)));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        addr,
        handle,
        embeddings,
        classifier,
        engine,
        cache_dir,
        source_dir,
    })
}
