use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use concierge_core::i18n::{self, Language};
use concierge_core::inquiry::Inquiry;
use tracing::error;

use crate::AppState;
use crate::models::InquiryResponse;
use crate::services::inquiry;

/// `POST /api/inquiry`: record a contact-form submission.
///
/// Only an unreadable body fails the request; CRM and mail problems are
/// logged by the fan-out and never reach the submitter.
pub async fn submit_inquiry_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let submission: Inquiry = match serde_json::from_slice(&body) {
        Ok(submission) => submission,
        Err(e) => {
            error!(error = %e, "unreadable inquiry body");
            let reply = InquiryResponse {
                success: false,
                message: None,
                error: Some(i18n::messages(Language::En).inquiry_failed.to_string()),
            };
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(reply)).into_response();
        }
    };

    inquiry::submit(&state, &submission).await;

    Json(InquiryResponse {
        success: true,
        message: Some(submission.acknowledgement().to_string()),
        error: None,
    })
    .into_response()
}
