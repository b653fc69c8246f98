#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc)]
mod common;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::MemoryQueue;
use contact_relay::api::{AppState, app_router};
use contact_relay::core::queue::{LeasedSubmission, SubmissionQueue};
use contact_relay::domain::submission::Submission;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

#[derive(Debug)]
struct UnavailableQueue;

#[async_trait]
impl SubmissionQueue for UnavailableQueue {
    async fn enqueue(&self, _submission: &Submission) -> anyhow::Result<String> {
        anyhow::bail!("connection refused")
    }

    async fn lease(&self, _limit: usize, _visibility_timeout: Duration) -> anyhow::Result<Vec<LeasedSubmission>> {
        Ok(Vec::new())
    }

    async fn ack(&self, _message_id: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn bury(&self, _leased: &LeasedSubmission) -> anyhow::Result<()> {
        Ok(())
    }
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn leased(queue: &MemoryQueue) -> Vec<LeasedSubmission> {
    queue.lease(10, Duration::from_secs(30)).await.unwrap()
}

#[tokio::test]
async fn test_submission_is_queued() {
    common::setup_tracing();
    let queue = Arc::new(MemoryQueue::default());
    let app = app_router(AppState { queue: Arc::clone(&queue) as Arc<dyn SubmissionQueue> });

    let body = json!({
        "id": "s1",
        "siteUrl": "example.com",
        "formName": "contact",
        "fields": [{"name": "name", "value": "Ana"}, {"name": "message", "value": "hola"}],
        "contactInfo": {"name": "Ana", "email": "ana@x.com"}
    });
    let response = app.oneshot(post_json("/v1/submissions", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert!(response.headers().contains_key("x-request-id"));
    let json = body_json(response).await;
    assert_eq!(json["messageId"], "msg-0");

    let jobs = leased(&queue).await;
    assert_eq!(jobs.len(), 1);
    let submission = &jobs[0].submission;
    assert_eq!(submission.form_name, "contact");
    assert_eq!(submission.field("message"), Some("hola"));
    let contact = submission.contact.as_ref().unwrap();
    assert_eq!(contact.email.as_deref(), Some("ana@x.com"));
    assert!(contact.phone.is_none());
}

#[tokio::test]
async fn test_invalid_submission_is_rejected() {
    common::setup_tracing();
    let queue = Arc::new(MemoryQueue::default());
    let app = app_router(AppState { queue: Arc::clone(&queue) as Arc<dyn SubmissionQueue> });

    let body = json!({"id": "s1", "siteUrl": "example.com", "formName": "  "});
    let response = app.oneshot(post_json("/v1/submissions", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Form name cannot be empty");
    assert_eq!(queue.len(), 0);
}

#[tokio::test]
async fn test_netlify_webhook_derives_contact() {
    common::setup_tracing();
    let queue = Arc::new(MemoryQueue::default());
    let app = app_router(AppState { queue: Arc::clone(&queue) as Arc<dyn SubmissionQueue> });

    let body = json!({
        "id": "5f1",
        "site_url": "https://example.com",
        "form_name": "contact",
        "ordered_human_fields": [
            {"title": "Name", "name": "name", "value": "Ana"},
            {"title": "Phone", "name": "phone", "value": "600000000"},
            {"title": "Message", "name": "message", "value": "hola"}
        ]
    });
    let response = app.oneshot(post_json("/v1/webhooks/netlify", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let jobs = leased(&queue).await;
    assert_eq!(jobs.len(), 1);
    let submission = &jobs[0].submission;
    assert_eq!(submission.id, "5f1");
    assert_eq!(submission.site_url, "https://example.com");
    assert_eq!(submission.fields.len(), 3);
    let contact = submission.contact.as_ref().unwrap();
    assert_eq!(contact.name.as_deref(), Some("Ana"));
    assert_eq!(contact.phone.as_deref(), Some("600000000"));
    assert!(contact.email.is_none());
}

#[tokio::test]
async fn test_queue_outage_returns_service_unavailable() {
    common::setup_tracing();
    let app = app_router(AppState { queue: Arc::new(UnavailableQueue) });

    let body = json!({"id": "s1", "siteUrl": "example.com", "formName": "contact"});
    let response = app.oneshot(post_json("/v1/submissions", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Submission queue unavailable");
}

#[tokio::test]
async fn test_malformed_body_is_client_error() {
    common::setup_tracing();
    let queue = Arc::new(MemoryQueue::default());
    let app = app_router(AppState { queue: Arc::clone(&queue) as Arc<dyn SubmissionQueue> });

    let response = app.oneshot(post_json("/v1/submissions", &json!({"id": 1}))).await.unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(queue.len(), 0);
}
