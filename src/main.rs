//! ragsense HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use ragsense::classifier::IntentClassifier;
use ragsense::config::Config;
use ragsense::embedding::{EmbeddingProvider, build_provider};
use ragsense::engine::{GenaiLlm, RetrievalQueryEngine};
use ragsense::gateway::{HandlerState, create_router_with_state};
use ragsense::ingest::Indexer;
use ragsense::pipeline::ChatPipeline;
use ragsense::vectordb::{QdrantIndex, VectorIndex};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const CLASSIFIER_RETRY_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
  ragsense  ::  route, retrieve, cite
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }
    let ingest_requested = std::env::args().any(|arg| arg == "--ingest");

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        source_dir = %config.source_dir.display(),
        "ragsense starting"
    );

    let provider = build_provider(&config.embedding)?;

    let classifier = Arc::new(IntentClassifier::new(
        provider.clone(),
        config.cache_dir.clone(),
    ));
    if let Err(e) = classifier.ensure_reference_embeddings_loaded().await {
        tracing::warn!(error = %e, "Reference embeddings not loaded; retrying in background");
        spawn_classifier_retry(classifier.clone());
    }

    let index = Arc::new(QdrantIndex::new(&config.qdrant_url)?);
    if let Err(e) = index
        .ensure_collection(&config.collection_name, provider.dimensions() as u64)
        .await
    {
        tracing::warn!(error = %e, url = %index.url(), "Qdrant collection unavailable");
    }

    if ingest_requested {
        let report = Indexer::new(provider.clone(), index.clone())
            .with_collection(config.collection_name.clone())
            .index_directory(&config.source_dir, &config.document_extensions)
            .await?;
        tracing::info!(
            files = report.files,
            chunks = report.chunks,
            skipped = report.skipped,
            "Ingestion finished"
        );
    }

    let engine = RetrievalQueryEngine::new(
        provider,
        index,
        Arc::new(GenaiLlm::new(config.llm_model.clone())),
    )
    .with_collection(config.collection_name.clone())
    .with_top_k(config.top_k)
    .with_template(config.prompt_template);

    let pipeline = ChatPipeline::new(classifier, Arc::new(engine), config.source_dir.clone())
        .with_document_extensions(config.document_extensions.clone())
        .with_subject(config.subject.clone());

    let app = create_router_with_state(HandlerState::new(Arc::new(pipeline)));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("ragsense shutdown complete");
    Ok(())
}

fn spawn_classifier_retry(classifier: Arc<IntentClassifier>) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(CLASSIFIER_RETRY_INTERVAL).await;
            match classifier.ensure_reference_embeddings_loaded().await {
                Ok(()) => {
                    tracing::info!("Reference embeddings loaded");
                    break;
                }
                Err(e) => tracing::warn!(error = %e, "Reference embedding load failed"),
            }
        }
    });
}

async fn run_health_check() -> i32 {
    let port = std::env::var("RAGSENSE_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
