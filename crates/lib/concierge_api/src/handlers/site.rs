use axum::Json;
use axum::extract::State;
use concierge_core::i18n::Language;

use crate::AppState;
use crate::models::SiteConfigResponse;

/// `GET /api/site-config`: public identifiers for the marketing pages.
pub async fn site_config_handler(State(state): State<AppState>) -> Json<SiteConfigResponse> {
    let site = &state.config.site;
    Json(SiteConfigResponse {
        contact_email: site.contact_email.clone(),
        whatsapp_number: site.whatsapp_number.clone(),
        wechat_id: site.wechat_id.clone(),
        line_id: site.line_id.clone(),
        form_service_id: site.form_service_id.clone(),
        ga_measurement_id: site.ga_measurement_id.clone(),
        clarity_project_id: site.clarity_project_id.clone(),
        languages: Language::ALL.to_vec(),
    })
}
