use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use super::domain::LeadKind;
use super::record_store::RecordStore;
use super::service::{LeadIntakeService, SubmissionError};

pub const VENUE_CONTACT_PATH: &str = "/api/venue-contact";
pub const WORKER_REGISTRATION_PATH: &str = "/api/workers";

/// Largest body accepted from either form. Larger bodies get a 413 envelope.
pub const MAX_SUBMISSION_BYTES: usize = 64 * 1024;

/// JSON envelope returned to the forms for every outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
}

impl SubmissionResponse {
    pub fn created(kind: LeadKind, record_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(kind.success_message().to_string()),
            record_id: Some(record_id.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            record_id: None,
        }
    }
}

/// Router builder exposing the two lead capture endpoints.
pub fn lead_router<S>(service: Arc<LeadIntakeService<S>>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route(VENUE_CONTACT_PATH, post(venue_contact_handler::<S>))
        .route(WORKER_REGISTRATION_PATH, post(worker_registration_handler::<S>))
        .layer(DefaultBodyLimit::max(MAX_SUBMISSION_BYTES))
        .with_state(service)
}

pub(crate) async fn venue_contact_handler<S>(
    State(service): State<Arc<LeadIntakeService<S>>>,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    S: RecordStore + 'static,
{
    match body {
        Ok(body) => respond(&service, LeadKind::Venue, &body).await,
        Err(rejection) => unreadable_body(LeadKind::Venue, rejection),
    }
}

pub(crate) async fn worker_registration_handler<S>(
    State(service): State<Arc<LeadIntakeService<S>>>,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    S: RecordStore + 'static,
{
    match body {
        Ok(body) => respond(&service, LeadKind::Worker, &body).await,
        Err(rejection) => unreadable_body(LeadKind::Worker, rejection),
    }
}

fn unreadable_body(kind: LeadKind, rejection: BytesRejection) -> Response {
    let status = rejection.status();
    info!(%kind, status = status.as_u16(), error = %rejection.body_text(), "lead body unreadable");
    let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "Request body is too large"
    } else {
        "Request body could not be read"
    };
    (status, Json(SubmissionResponse::failure(message))).into_response()
}

async fn respond<S>(service: &LeadIntakeService<S>, kind: LeadKind, body: &[u8]) -> Response
where
    S: RecordStore + 'static,
{
    // Parsed here rather than through the Json extractor so malformed bodies
    // still get the form envelope.
    let payload: Value = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(err) => {
            info!(%kind, error = %err, "lead body is not valid JSON");
            let payload = SubmissionResponse::failure("Request body must be valid JSON");
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.submit(kind, &payload).await {
        Ok(receipt) => {
            let payload = SubmissionResponse::created(kind, receipt.record_id.0);
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(SubmissionError::Validation(err)) => {
            let payload = SubmissionResponse::failure(err.message());
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(SubmissionError::RecordStore(err)) => {
            let message = if err.is_public() {
                err.to_string()
            } else {
                error!(%kind, error = ?err, "record store unreachable");
                kind.generic_failure_message().to_string()
            };
            let payload = SubmissionResponse::failure(message);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
