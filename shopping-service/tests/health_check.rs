mod common;

use axum::body::Body;
use axum::http::Request;
use common::{test_config, TestApp};
use shopping_service::services::InMemoryItemStore;
use shopping_service::startup::router;
use shopping_service::Application;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "shopping-service");
}

#[tokio::test]
async fn readiness_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/ready"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/count-items"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.headers()["x-request-id"], "trace-me");
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn request_span_records_minted_request_id() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_writer(logs.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = Application::build_with_store(
        test_config("http://127.0.0.1:9"),
        Arc::new(InMemoryItemStore::new()),
    )
    .await
    .expect("Failed to build test application");

    let response = router(app.state())
        .oneshot(
            Request::builder()
                .uri("/generate-id")
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Request failed");

    let request_id = response.headers()["x-request-id"]
        .to_str()
        .expect("Header is not ASCII")
        .to_string();

    let output = logs.contents();
    assert!(
        output.contains(&format!("request_id={}", request_id)),
        "span did not carry request id {}: {}",
        request_id,
        output
    );
    assert!(!output.contains("request_id=-"));
}
