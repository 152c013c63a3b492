//! Request and response bodies.

use concierge_core::i18n::Language;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(alias = "api_key", alias = "secret")]
    pub api_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub authenticated: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Inquiry endpoint reply: `{success, message}` or `{success: false, error}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct InquiryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigResponse {
    pub contact_email: String,
    pub whatsapp_number: String,
    pub wechat_id: String,
    pub line_id: String,
    pub form_service_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ga_measurement_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarity_project_id: Option<String>,
    pub languages: Vec<Language>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `?q=` search text and `?cursor=` pagination for list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub cursor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// Data behind the workspace landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceOverview {
    /// The integration's bot user.
    pub bot: Value,
    /// Databases shared with the integration.
    pub databases: Value,
}
