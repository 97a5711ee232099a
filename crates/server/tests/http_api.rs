//! End-to-end tests over the HTTP surface, with in-memory stores standing
//! in for the document store.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use zepp_core::JobStatus;
use zepp_ocr::{OcrError, TextRecognizer};
use zepp_server::routes::router;
use zepp_server::{AppState, Settings};
use zepp_store::{JobStore, MemoryJobStore, MemoryUserStore, ObjectId, StoreError};

struct Harness {
    app: Router,
    jobs: Arc<MemoryJobStore>,
    users: Arc<MemoryUserStore>,
}

fn harness_with_ocr(ocr: Option<Arc<dyn TextRecognizer>>) -> Harness {
    let jobs = Arc::new(MemoryJobStore::new());
    let users = Arc::new(MemoryUserStore::new());
    let state = AppState::new(Settings::default(), jobs.clone(), users.clone(), ocr);
    Harness {
        app: router(state),
        jobs,
        users,
    }
}

fn harness() -> Harness {
    harness_with_ocr(None)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    read_json(response).await
}

async fn post_multipart(app: &Router, uri: &str, payload: &[u8]) -> (StatusCode, Value) {
    let mut body = Vec::new();
    body.extend_from_slice(
        b"--BOUNDARY\r\nContent-Disposition: form-data; name=\"image\"; filename=\"coupon.png\"\r\nContent-Type: image/png\r\n\r\n",
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(b"\r\n--BOUNDARY--\r\n");

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=BOUNDARY",
        )
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Poll the job store until the job reaches `want`, or panic after ~2s.
async fn wait_for_job(jobs: &MemoryJobStore, id: &str, want: Option<JobStatus>) {
    for _ in 0..200 {
        match (jobs.get(id).await, want) {
            (Err(StoreError::NotFound), None) => return,
            (Ok(job), Some(status)) if job.status == status => return,
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    panic!("job {id} did not reach {want:?}");
}

#[tokio::test]
async fn health_reports_service_metadata() {
    let h = harness();
    let (status, body) = get(&h.app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pass");
    assert_eq!(body["service"], "Zepp NLP Engine");
    assert_eq!(body["version"], "1.0.0");
}

#[tokio::test]
async fn submitted_job_is_processed_and_pruned() {
    let h = harness();
    let user_id = h.users.add_user().to_hex();

    let (status, body) = post_json(
        &h.app,
        "/jobs/submit",
        json!({ "text": "50% off", "userId": user_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "submitted");
    let job_id = body["id"].as_str().expect("job id").to_string();

    wait_for_job(&h.jobs, &job_id, None).await;

    let (status, users) = get(&h.app, "/users").await;
    assert_eq!(status, StatusCode::OK);
    let coupons = users[0]["coupons"].as_array().unwrap();
    assert_eq!(coupons.len(), 1);
    assert_eq!(coupons[0]["discount"], 50);
    assert_eq!(coupons[0]["description"], "50% off");

    let (status, _) = get(&h.app, &format!("/jobs/{job_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_coupon_text_round_trips_through_the_pipeline() {
    let h = harness();
    let user_id = h.users.add_user().to_hex();
    let text = "Get 20% off at Acme Corp before March 5, 2024! http://acme.example/deal";

    let (_, body) = post_json(
        &h.app,
        "/jobs/submit",
        json!({ "text": text, "userId": user_id }),
    )
    .await;
    let job_id = body["id"].as_str().unwrap().to_string();
    wait_for_job(&h.jobs, &job_id, None).await;

    let (_, users) = get(&h.app, "/users").await;
    let coupon = &users[0]["coupons"][0];
    assert_eq!(coupon["link"], "http://acme.example/deal");
    assert_eq!(coupon["discount"], 20);
    assert_eq!(coupon["title"], "Acme Corp");
    assert_eq!(coupon["expiry"], "2024-03-05");
    assert_eq!(coupon["description"], text);
}

#[tokio::test]
async fn job_for_unknown_user_fails_and_is_retained() {
    let h = harness();

    let (_, body) = post_json(
        &h.app,
        "/jobs/submit",
        json!({ "text": "30% off", "userId": ObjectId::new().to_hex() }),
    )
    .await;
    let job_id = body["id"].as_str().unwrap().to_string();

    wait_for_job(&h.jobs, &job_id, Some(JobStatus::Failed)).await;

    let (status, jobs) = get(&h.app, "/jobs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(jobs.as_array().unwrap().len(), 1);
    assert_eq!(jobs[0]["status"], "failed");

    let (status, job) = get(&h.app, &format!("/jobs/{job_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["status"], "failed");
    assert_eq!(job["text"], "30% off");
}

#[tokio::test]
async fn malformed_job_id_gets_its_own_error_shape() {
    let h = harness();
    let (status, body) = get(&h.app, "/jobs/not-a-valid-id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "malformed job id");
}

#[tokio::test]
async fn unknown_job_id_is_not_found() {
    let h = harness();
    let (status, body) = get(&h.app, &format!("/jobs/{}", ObjectId::new().to_hex())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "job not found");
}

#[tokio::test]
async fn listing_starts_empty() {
    let h = harness();
    let (status, jobs) = get(&h.app, "/jobs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(jobs, json!([]));
    let (status, users) = get(&h.app, "/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn ocr_without_an_engine_reports_unavailable() {
    let h = harness();
    let (status, body) = post_multipart(&h.app, "/jobs/ocr", b"fake image bytes").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "error");
    assert_eq!(body["details"], "OCR front-end not configured");
}

/// Recognizer that skips decoding; exercises the upload plumbing.
struct CannedText(&'static str);

impl TextRecognizer for CannedText {
    fn recognize(&self, _image: &image::DynamicImage) -> Result<String, OcrError> {
        Ok(self.0.to_string())
    }

    fn recognize_bytes(&self, _bytes: &[u8]) -> Result<String, OcrError> {
        Ok(self.0.to_string())
    }
}

#[tokio::test]
async fn ocr_returns_recognized_text() {
    let h = harness_with_ocr(Some(Arc::new(CannedText("Get 20% off"))));
    let (status, body) = post_multipart(&h.app, "/jobs/ocr", b"fake image bytes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Get 20% off");
}
