/// Integration tests for the REST client against loopback servers.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use api_client::{ApiClient, ApiError};

/// Serve an app on an ephemeral loopback port, returning its base URL.
async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn document_list_app() -> Router {
    Router::new().route(
        "/documents",
        get(|| async {
            Json(serde_json::json!([
                {
                    "id": "doc-1",
                    "name": "Launch checklist",
                    "contributors": [{"name": "Alice", "avatar_url": null}],
                    "version": 2,
                    "created_at": "2026-08-02T09:30:00Z",
                    "attachments": []
                },
                {
                    "id": "doc-2",
                    "name": "Retro notes",
                    "contributors": [{"name": "Bob", "avatar_url": "https://example.com/bob.png"}],
                    "version": 1,
                    "created_at": "2026-08-01T14:00:00Z",
                    "attachments": [{"name": "summary.pdf", "size_bytes": 4096}]
                }
            ]))
        }),
    )
}

fn counting_app(hits: Arc<AtomicUsize>, status: StatusCode) -> Router {
    Router::new().route(
        "/documents",
        get(move || {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                status
            }
        }),
    )
}

#[tokio::test]
async fn fetch_documents_returns_the_parsed_list() {
    let base = spawn_app(document_list_app()).await;
    let client = ApiClient::new(&base).unwrap();

    let documents = client.fetch_documents().await.unwrap();

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].id, "doc-1");
    assert_eq!(documents[0].version, 2);
    assert_eq!(documents[1].attachments[0].size_bytes, 4096);
}

#[tokio::test]
async fn server_errors_exhaust_the_attempt_budget() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_app(counting_app(hits.clone(), StatusCode::INTERNAL_SERVER_ERROR)).await;
    let client = ApiClient::new(&base).unwrap();

    let result = client
        .retry_fetch(|| client.fetch_documents(), 3, Duration::from_millis(10))
        .await;

    assert!(matches!(
        &result,
        Err(ApiError::Status(status)) if *status == StatusCode::INTERNAL_SERVER_ERROR
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn client_errors_fail_on_the_first_attempt() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_app(counting_app(hits.clone(), StatusCode::NOT_FOUND)).await;
    let client = ApiClient::new(&base).unwrap();

    let result = client
        .retry_fetch(|| client.fetch_documents(), 3, Duration::from_millis(10))
        .await;

    assert!(matches!(
        &result,
        Err(ApiError::Status(status)) if *status == StatusCode::NOT_FOUND
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn a_retryable_failure_followed_by_success_recovers() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/documents",
        get(move || {
            let hits = counter.clone();
            async move {
                if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!(null)))
                } else {
                    (StatusCode::OK, Json(serde_json::json!([])))
                }
            }
        }),
    );
    let base = spawn_app(app).await;
    let client = ApiClient::new(&base).unwrap();

    let documents = client
        .retry_fetch(|| client.fetch_documents(), 3, Duration::from_millis(10))
        .await
        .unwrap();

    assert!(documents.is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn a_non_array_payload_is_a_fetch_failure() {
    let app = Router::new().route(
        "/documents",
        get(|| async { Json(serde_json::json!({"documents": []})) }),
    );
    let base = spawn_app(app).await;
    let client = ApiClient::new(&base).unwrap();

    let result = client.fetch_documents().await;

    match result {
        Err(err @ ApiError::Payload(_)) => assert!(!err.is_retryable()),
        other => panic!("expected payload error, got {other:?}"),
    }
}

#[tokio::test]
async fn probe_reports_a_live_server() {
    let base = spawn_app(document_list_app()).await;
    let client = ApiClient::new(&base).unwrap();

    assert!(client.is_server_available().await);
}

#[tokio::test]
async fn probe_reports_a_dead_server_without_erroring() {
    // Grab an ephemeral port and release it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(format!("http://{addr}")).unwrap();
    assert!(!client.is_server_available().await);
}
