use std::fs;
use std::sync::Arc;

use axum::{Router, body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use super::*;
use crate::classifier::IntentClassifier;
use crate::embedding::MockEmbeddingProvider;
use crate::engine::{MockQueryEngine, QueryResponse, SourceNode};
use crate::pipeline::ChatPipeline;
use crate::vectordb::PAYLOAD_FILE_NAME;

struct TestApp {
    router: Router,
    classifier: Arc<IntentClassifier>,
    engine: Arc<MockQueryEngine>,
    _cache: TempDir,
    _source: TempDir,
}

async fn setup(load: bool) -> TestApp {
    let cache = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    fs::write(source.path().join("guide.pdf"), b"%PDF").unwrap();

    let mock = Arc::new(MockEmbeddingProvider::new());
    let classifier = Arc::new(IntentClassifier::new(mock, cache.path()));
    if load {
        classifier.ensure_reference_embeddings_loaded().await.unwrap();
    }

    let engine = Arc::new(MockQueryEngine::with_response(QueryResponse::new(
        "Use the blue form.",
        vec![SourceNode::new("chunk", 0.9).with_metadata(PAYLOAD_FILE_NAME, "guide.pdf")],
    )));
    let pipeline = Arc::new(ChatPipeline::new(
        classifier.clone(),
        engine.clone(),
        source.path(),
    ));

    TestApp {
        router: create_router_with_state(HandlerState::new(pipeline)),
        classifier,
        engine,
        _cache: cache,
        _source: source,
    }
}

async fn send(router: &Router, method: &str, uri: &str, body: Body) -> axum::response::Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(body)
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn chat_body(message: &str) -> Body {
    Body::from(serde_json::json!({ "message": message }).to_string())
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup(false).await;

    let response = send(&app.router, "GET", "/healthz", Body::empty()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(STATUS_HEADER).unwrap().to_str().unwrap(),
        "healthy"
    );
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_ready_endpoint_tracks_classifier() {
    let app = setup(false).await;

    let response = send(&app.router, "GET", "/readyz", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["classifier"], "unloaded");

    app.classifier
        .ensure_reference_embeddings_loaded()
        .await
        .unwrap();

    let response = send(&app.router, "GET", "/readyz", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_chat_answered() {
    let app = setup(true).await;

    let response = send(
        &app.router,
        "POST",
        "/v1/chat",
        chat_body("Which form do I use for expenses?"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(STATUS_HEADER).unwrap().to_str().unwrap(),
        "answered"
    );

    let json = body_json(response).await;
    assert_eq!(json["route"], "answered");
    assert_eq!(
        json["text"],
        "Use the blue form.\n\nSource Documents:\nguide.pdf\n"
    );
    assert_eq!(json["sources"][0]["name"], "guide.pdf");
    assert!(json["sources"][0]["path"].as_str().unwrap().ends_with("guide.pdf"));
    assert!(uuid::Uuid::parse_str(json["id"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_chat_greeting() {
    let app = setup(true).await;

    let response = send(&app.router, "POST", "/v1/chat", chat_body("Hello")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["route"], "greeting");
    assert_eq!(json["sources"].as_array().unwrap().len(), 0);
    assert!(app.engine.queries().is_empty());
}

#[tokio::test]
async fn test_chat_rejects_bad_bodies() {
    let app = setup(true).await;

    for body in [
        Body::empty(),
        Body::from("{not json"),
        Body::from(r#"{"text": "wrong field"}"#),
        chat_body("   "),
    ] {
        let response = send(&app.router, "POST", "/v1/chat", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(STATUS_HEADER).unwrap().to_str().unwrap(),
            "invalid_request"
        );
        assert_eq!(body_json(response).await["code"], 400);
    }
    assert!(app.engine.queries().is_empty());
}

#[tokio::test]
async fn test_chat_engine_failure_is_bad_gateway() {
    let app = setup(true).await;
    app.engine.set_failing(true);

    let response = send(
        &app.router,
        "POST",
        "/v1/chat",
        chat_body("Which form do I use for expenses?"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], 502);
    assert!(json["error"].as_str().unwrap().contains("chat pipeline failed"));
}

#[test]
fn test_parse_chat_request() {
    assert_eq!(
        parse_chat_request(br#"{"message":"hi"}"#).unwrap().message,
        "hi"
    );
    assert!(matches!(
        parse_chat_request(b""),
        Err(GatewayError::InvalidRequest(_))
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn test_general_info_lists_non_utf8_file_names() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let cache = TempDir::new().unwrap();
    let source = TempDir::new().unwrap();
    fs::write(
        source.path().join(OsStr::from_bytes(b"r\xe9sum\xe9.pdf")),
        b"%PDF",
    )
    .unwrap();

    let mock = Arc::new(MockEmbeddingProvider::new());
    mock.set_score("What documents do you have?", 0.9);
    let classifier = Arc::new(IntentClassifier::new(mock, cache.path()));
    classifier.ensure_reference_embeddings_loaded().await.unwrap();
    let engine = Arc::new(MockQueryEngine::with_response(QueryResponse::new(
        "unused",
        Vec::new(),
    )));
    let pipeline = Arc::new(ChatPipeline::new(classifier, engine, source.path()));
    let router = create_router_with_state(HandlerState::new(pipeline));

    let response = send(
        &router,
        "POST",
        "/v1/chat",
        chat_body("What documents do you have?"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["route"], "general_info");
    let sources = json["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0]["name"], "r\u{fffd}sum\u{fffd}.pdf");
    assert!(
        sources[0]["path"]
            .as_str()
            .unwrap()
            .ends_with("r\u{fffd}sum\u{fffd}.pdf")
    );
}

#[test]
fn test_chat_source_keeps_missing_path() {
    let source = ChatSource::from(crate::pipeline::SourceDocument {
        name: "gone.pdf".to_string(),
        path: None,
    });
    assert_eq!(
        source,
        ChatSource {
            name: "gone.pdf".to_string(),
            path: None,
        }
    );
}
