use axum::extract::State;
use axum::{Extension, Json};
use concierge_core::envelope::Envelope;

use crate::AppState;
use crate::middleware::session::WorkspaceSession;
use crate::models::WorkspaceOverview;
use crate::services::notion::NotionActions;

/// `GET /workspace`: bot user and shared databases for the signed-in integration.
pub async fn workspace_handler(
    State(state): State<AppState>,
    Extension(session): Extension<WorkspaceSession>,
) -> Json<Envelope<WorkspaceOverview>> {
    Json(NotionActions::for_session(&state, &session).overview().await)
}
