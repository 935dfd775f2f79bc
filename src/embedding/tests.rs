use super::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn openai_settings(endpoint: &str, dims: usize) -> EmbeddingSettings {
    EmbeddingSettings {
        backend: EmbeddingBackend::OpenAi,
        endpoint: endpoint.to_string(),
        api_key: Some("test-key".to_string()),
        model: "text-embedding-3-small".to_string(),
        dimensions: dims,
        ..Default::default()
    }
}

#[test]
fn test_cosine_similarity_basics() {
    assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_similarity_degenerate_inputs() {
    assert_eq!(cosine_similarity(&[], &[]), 0.0);
    assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
}

#[test]
fn test_mean_pool() {
    let pooled = mean_pool(&[vec![1.0, 2.0], vec![3.0, 6.0]]).unwrap();
    assert_eq!(pooled, vec![2.0, 4.0]);
}

#[test]
fn test_mean_pool_rejects_empty_and_ragged() {
    assert!(matches!(mean_pool(&[]), Err(EmbeddingError::EmptyInput)));
    assert!(matches!(
        mean_pool(&[vec![1.0, 2.0], vec![1.0]]),
        Err(EmbeddingError::DimensionMismatch {
            expected: 2,
            actual: 1
        })
    ));
}

#[test]
fn test_l2_normalize() {
    let mut v = vec![3.0, 4.0];
    l2_normalize(&mut v);
    assert!((v[0] - 0.6).abs() < 1e-6);
    assert!((v[1] - 0.8).abs() < 1e-6);

    let mut zero = vec![0.0, 0.0];
    l2_normalize(&mut zero);
    assert_eq!(zero, vec![0.0, 0.0]);
}

#[tokio::test]
async fn test_stub_is_deterministic_and_normalized() {
    let stub = StubEmbeddings::new(64);
    let a = stub.embed("What documents do you have?").await.unwrap();
    let b = stub.embed("What documents do you have?").await.unwrap();
    let c = stub.embed("Something else").await.unwrap();

    assert_eq!(a.len(), 64);
    assert_eq!(a, b);
    assert_ne!(a, c);

    let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_default_aggregate_is_mean_of_batch() {
    let stub = StubEmbeddings::new(16);
    let inputs = texts(&["alpha", "beta"]);

    let batch = stub.embed_batch(&inputs).await.unwrap();
    let aggregate = stub.aggregate_embed(&inputs).await.unwrap();

    assert_eq!(aggregate, mean_pool(&batch).unwrap());
}

#[tokio::test]
async fn test_default_aggregate_rejects_empty_input() {
    let stub = StubEmbeddings::new(16);
    assert!(matches!(
        stub.aggregate_embed(&[]).await,
        Err(EmbeddingError::EmptyInput)
    ));
}

#[tokio::test]
async fn test_single_item_aggregate_equals_embed() {
    let stub = StubEmbeddings::new(16);
    let single = stub.aggregate_embed(&texts(&["hello there"])).await.unwrap();
    let embedded = stub.embed("hello there").await.unwrap();
    assert_eq!(single, embedded);
}

#[test]
fn test_build_provider_stub() {
    let provider = build_provider(&EmbeddingSettings::stub(32)).unwrap();
    assert_eq!(provider.dimensions(), 32);
    assert_eq!(provider.model_id(), "stub-32");
}

#[test]
fn test_build_provider_remote_requires_key() {
    let settings = EmbeddingSettings {
        api_key: None,
        ..Default::default()
    };
    assert!(matches!(
        build_provider(&settings),
        Err(EmbeddingError::InvalidConfig { .. })
    ));
}

#[test]
fn test_backend_from_str() {
    assert_eq!("OpenAI".parse::<EmbeddingBackend>(), Ok(EmbeddingBackend::OpenAi));
    assert_eq!("azure".parse::<EmbeddingBackend>(), Ok(EmbeddingBackend::Azure));
    assert_eq!(" stub ".parse::<EmbeddingBackend>(), Ok(EmbeddingBackend::Stub));
    assert!("vertex".parse::<EmbeddingBackend>().is_err());
}

#[tokio::test]
async fn test_openai_embed_batch_orders_by_index() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "index": 1, "embedding": [0.0, 1.0, 0.0] },
                { "index": 0, "embedding": [1.0, 0.0, 0.0] }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiEmbeddings::from_settings(&openai_settings(&server.uri(), 3)).unwrap();
    let vectors = client.embed_batch(&texts(&["first", "second"])).await.unwrap();

    assert_eq!(vectors, vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]);
}

#[tokio::test]
async fn test_openai_v3_model_requests_configured_dimensions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_partial_json(json!({
            "model": "text-embedding-3-small",
            "dimensions": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "index": 0, "embedding": [0.6, 0.8] }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiEmbeddings::from_settings(&openai_settings(&server.uri(), 2)).unwrap();
    let vectors = client.embed_batch(&texts(&["shortened"])).await.unwrap();

    assert_eq!(vectors, vec![vec![0.6, 0.8]]);
}

#[tokio::test]
async fn test_openai_legacy_model_omits_dimensions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "index": 0, "embedding": [1.0, 0.0, 0.0] }]
        })))
        .mount(&server)
        .await;

    let settings = EmbeddingSettings {
        model: "text-embedding-ada-002".to_string(),
        ..openai_settings(&server.uri(), 3)
    };
    let client = OpenAiEmbeddings::from_settings(&settings).unwrap();
    client.embed_batch(&texts(&["x"])).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "text-embedding-ada-002");
    assert!(body.get("dimensions").is_none());
}

#[tokio::test]
async fn test_openai_api_error_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let client = OpenAiEmbeddings::from_settings(&openai_settings(&server.uri(), 3)).unwrap();
    let err = client.embed_batch(&texts(&["x"])).await.unwrap_err();

    match err {
        EmbeddingError::Api { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_openai_dimension_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "index": 0, "embedding": [1.0, 0.0] }]
        })))
        .mount(&server)
        .await;

    let client = OpenAiEmbeddings::from_settings(&openai_settings(&server.uri(), 3)).unwrap();
    assert!(matches!(
        client.embed_batch(&texts(&["x"])).await,
        Err(EmbeddingError::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[tokio::test]
async fn test_openai_count_mismatch_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let client = OpenAiEmbeddings::from_settings(&openai_settings(&server.uri(), 3)).unwrap();
    assert!(matches!(
        client.embed_batch(&texts(&["x"])).await,
        Err(EmbeddingError::MalformedResponse { .. })
    ));
}

#[tokio::test]
async fn test_azure_uses_deployment_url_and_api_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/embed-prod/embeddings"))
        .and(query_param("api-version", "2024-02-01"))
        .and(header("api-key", "azure-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "index": 0, "embedding": [0.5, 0.5] }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = EmbeddingSettings {
        backend: EmbeddingBackend::Azure,
        endpoint: format!("{}/", server.uri()),
        api_key: Some("azure-key".to_string()),
        model: "embed-prod".to_string(),
        dimensions: 2,
        ..Default::default()
    };
    let client = OpenAiEmbeddings::from_settings(&settings).unwrap();
    let vector = client.embed("hello").await.unwrap();

    assert_eq!(vector, vec![0.5, 0.5]);
    assert_eq!(client.model_id(), "embed-prod");
}

#[tokio::test]
async fn test_mock_scripted_similarity() {
    let mock = MockEmbeddingProvider::new();
    mock.set_score("scripted", 0.42);

    let centroid = mock.aggregate_embed(&texts(&["a", "b"])).await.unwrap();
    let scripted = mock.embed("scripted").await.unwrap();
    let other = mock.embed("other").await.unwrap();

    assert_eq!(mock.similarity(&centroid, &scripted), 0.42);
    assert_eq!(mock.similarity(&centroid, &other), 0.0);
    assert_eq!(mock.similarity(&other, &other), 1.0);
    assert_eq!(mock.aggregate_calls(), 3);
    assert_eq!(mock.aggregate_calls_for(&["a", "b"]), 1);
}
