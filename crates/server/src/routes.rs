//! HTTP routes and handlers.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use zepp_ocr::OcrError;
use zepp_store::{JobDocument, UserDocument};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the service router, nested under the configured proxy prefix when
/// one is set.
pub fn router(state: AppState) -> Router {
    let prefix = state.settings.route_prefix().map(str::to_string);
    let api = Router::new()
        .route("/", get(health))
        .route("/jobs", get(list_jobs))
        .route("/jobs/submit", post(submit_job))
        .route("/jobs/ocr", post(recognize_image))
        .route("/jobs/:job_id", get(get_job))
        .route("/users", get(list_users))
        .with_state(state);

    match prefix {
        Some(prefix) => Router::new().nest(&prefix, api),
        None => api,
    }
}

/// Health probe.
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "pass",
        "service": state.settings.title,
        "version": state.settings.version,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn list_jobs(State(state): State<AppState>) -> Result<Json<Vec<JobDocument>>, ApiError> {
    Ok(Json(state.jobs.list().await?))
}

async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobDocument>, ApiError> {
    Ok(Json(state.jobs.get(&job_id).await?))
}

#[derive(Debug, Deserialize)]
struct SubmitRequest {
    text: String,
    #[serde(rename = "userId")]
    user_id: String,
}

/// Queue a text for extraction. Returns as soon as the job document is
/// written; processing happens on a worker task.
async fn submit_job(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Response {
    match state.runner.submit(request.text, request.user_id).await {
        Ok(id) => Json(json!({ "status": "submitted", "id": id })).into_response(),
        Err(err) => {
            warn!(error = %err, "job submission failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error", "id": null })),
            )
                .into_response()
        }
    }
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserDocument>>, ApiError> {
    Ok(Json(state.users.list().await?))
}

/// Run OCR over an uploaded image and return the recognized text. Failures
/// come back as an error payload; they never take the service down.
async fn recognize_image(State(state): State<AppState>, mut upload: Multipart) -> Response {
    let Some(engine) = state.ocr.clone() else {
        return ocr_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "OCR front-end not configured",
        );
    };

    let bytes = loop {
        match upload.next_field().await {
            Ok(Some(field)) => match field.bytes().await {
                Ok(bytes) if !bytes.is_empty() => break bytes,
                Ok(_) => continue,
                Err(err) => return ocr_error(StatusCode::BAD_REQUEST, &err.to_string()),
            },
            Ok(None) => return ocr_error(StatusCode::BAD_REQUEST, "no image in upload"),
            Err(err) => return ocr_error(StatusCode::BAD_REQUEST, &err.to_string()),
        }
    };

    match engine.recognize_bytes(&bytes) {
        Ok(text) => Json(json!({ "text": text })).into_response(),
        Err(err @ OcrError::InvalidImage(_)) => {
            ocr_error(StatusCode::BAD_REQUEST, &err.to_string())
        }
        Err(err) => {
            warn!(error = %err, "OCR failed");
            ocr_error(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

fn ocr_error(status: StatusCode, details: &str) -> Response {
    (status, Json(json!({ "status": "error", "details": details }))).into_response()
}
