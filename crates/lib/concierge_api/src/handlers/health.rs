use axum::Json;

use crate::models::HealthResponse;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: concierge_core::version().to_string(),
    })
}
