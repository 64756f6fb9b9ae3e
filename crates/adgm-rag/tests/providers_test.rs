//! HTTP provider tests against wiremock servers.
//!
//! | Client            | Endpoint                 | Tests |
//! |-------------------|--------------------------|-------|
//! | `OpenAiEmbeddings`| `POST /embeddings`       | `embeddings_*` |
//! | `Scraper`         | `GET {page}`             | `scraper_*` |
//! | `build_index`     | both                     | `build_*` |

use adgm_rag::{
    build_index, BuildOptions, Embedder, HashingEmbedder, OpenAiEmbeddings,
    OpenAiEmbeddingsConfig, RagError, Retriever, Scraper, TextSplitter, VectorIndex,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn embeddings_client(server: &MockServer, batch_size: usize) -> Embedder {
    let mut config = OpenAiEmbeddingsConfig::new(
        server.uri().parse().unwrap(),
        "text-embedding-3-small",
        "sk-test",
    );
    config.timeout_secs = 5;
    config.batch_size = batch_size;
    Embedder::OpenAi(OpenAiEmbeddings::new(config).unwrap())
}

// ── POST /embeddings ─────────────────────────────────────────────────

#[tokio::test]
async fn embeddings_sends_model_and_bearer_and_orders_by_index() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "text-embedding-3-small",
            "input": ["first", "second"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "data": [
                { "object": "embedding", "index": 1, "embedding": [0.0, 1.0] },
                { "object": "embedding", "index": 0, "embedding": [1.0, 0.0] }
            ],
            "model": "text-embedding-3-small"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = embeddings_client(&server, 16);
    let vectors = embedder
        .embed_documents(&["first".to_string(), "second".to_string()])
        .await
        .unwrap();

    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    assert_eq!(embedder.model(), "text-embedding-3-small");
}

#[tokio::test]
async fn embeddings_are_requested_in_batches() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                { "index": 0, "embedding": [1.0] },
                { "index": 1, "embedding": [1.0] }
            ]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let embedder = embeddings_client(&server, 2);
    let texts: Vec<String> = (0..4).map(|i| format!("chunk {i}")).collect();
    let vectors = embedder.embed_documents(&texts).await.unwrap();
    assert_eq!(vectors.len(), 4);
}

#[tokio::test]
async fn embeddings_surfaces_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = embeddings_client(&server, 8)
        .embed_query("hello")
        .await
        .unwrap_err();
    match err {
        RagError::ApiError { status, body, .. } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn embeddings_rejects_short_responses() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })),
        )
        .mount(&server)
        .await;

    let err = embeddings_client(&server, 8)
        .embed_query("hello")
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::EmbeddingCount { expected: 1, got: 0 }));
}

#[tokio::test]
async fn embeddings_rejects_malformed_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = embeddings_client(&server, 8)
        .embed_query("hello")
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::Deserialization { .. }));
}

// ── Web sources ──────────────────────────────────────────────────────

#[tokio::test]
async fn scraper_flattens_page_and_skips_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/setting-up"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><h2>Setting up in ADGM</h2><p>Choose a legal structure.</p></body></html>",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let scraper = Scraper::new(Duration::from_secs(5)).unwrap();
    let urls = vec![
        format!("{}/setting-up", server.uri()),
        format!("{}/gone", server.uri()),
    ];
    let docs = scraper.fetch_all(&urls).await;

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].source, urls[0]);
    assert_eq!(docs[0].text, "Setting up in ADGM Choose a legal structure.");
}

// ── End-to-end build ────────────────────────────────────────────────

#[tokio::test]
async fn build_combines_files_and_pages_then_reloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/letters-and-permits"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><p>Employers apply for work permits through the ADGM portal.</p></body></html>",
        ))
        .mount(&server)
        .await;

    let data = tempfile::tempdir().unwrap();
    std::fs::write(
        data.path().join("courts.txt"),
        "Contracts should submit disputes to the ADGM Courts.",
    )
    .unwrap();

    let options = BuildOptions {
        data_dir: data.path().to_path_buf(),
        web_sources: vec![format!("{}/letters-and-permits", server.uri())],
        splitter: TextSplitter::default(),
    };
    let embedder = Embedder::Hashing(HashingEmbedder::new(128));
    let scraper = Scraper::new(Duration::from_secs(5)).unwrap();

    let index = build_index(&options, &embedder, Some(&scraper)).await.unwrap();
    assert_eq!(index.len(), 2);

    let out = tempfile::tempdir().unwrap();
    index.save(out.path()).unwrap();
    let loaded = Arc::new(VectorIndex::load(out.path()).unwrap());

    let retriever = Retriever::new(loaded, embedder).unwrap();
    let hits = retriever.retrieve("work permits for employees", 1).await.unwrap();
    assert!(hits[0].text.contains("work permits"));
}

#[tokio::test]
async fn build_fails_when_every_source_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let data = tempfile::tempdir().unwrap();
    let options = BuildOptions {
        data_dir: data.path().to_path_buf(),
        web_sources: vec![format!("{}/setting-up", server.uri())],
        splitter: TextSplitter::default(),
    };
    let scraper = Scraper::new(Duration::from_secs(5)).unwrap();
    let err = build_index(
        &options,
        &Embedder::Hashing(HashingEmbedder::default()),
        Some(&scraper),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RagError::NoSources));
}
