//! API server configuration.

use concierge_core::mail::DEFAULT_MAIL_BASE_URL;
use concierge_core::notion::DEFAULT_NOTION_BASE_URL;
use concierge_core::session::resolve_session_secret;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// `true` when running in production: session cookies get `Secure`.
    pub production: bool,
    /// Session signing secret.
    pub session_secret: String,
    /// Where unauthenticated workspace page requests are redirected.
    pub setup_path: String,
    /// Notion REST base URL.
    pub notion_base_url: String,
    pub crm: CrmConfig,
    pub mail: MailConfig,
    pub site: SiteConfig,
}

/// Server-held Notion credentials for the inquiry CRM.
#[derive(Clone, Debug, Default)]
pub struct CrmConfig {
    pub api_key: Option<String>,
    pub database_id: Option<String>,
}

#[derive(Clone, Debug)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub from: String,
}

/// Public identifiers exposed to the marketing pages.
#[derive(Clone, Debug, Default)]
pub struct SiteConfig {
    pub contact_email: String,
    pub whatsapp_number: String,
    pub wechat_id: String,
    pub line_id: String,
    pub form_service_id: String,
    pub ga_measurement_id: Option<String>,
    pub clarity_project_id: Option<String>,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                     | Default                              |
    /// |------------------------------|--------------------------------------|
    /// | `BIND_ADDR`                  | `127.0.0.1:3000`                     |
    /// | `APP_ENV`                    | `development`                        |
    /// | `SESSION_SECRET` / `JWT_SECRET` | generated & persisted to file     |
    /// | `SETUP_PATH`                 | `/setup`                             |
    /// | `NOTION_API_BASE_URL`        | `https://api.notion.com/v1`          |
    /// | `NOTION_API_KEY`             | unset (CRM write skipped)            |
    /// | `NOTION_INQUIRY_DATABASE_ID` | unset (CRM write skipped)            |
    /// | `MAIL_API_KEY`               | unset (emails skipped)               |
    /// | `MAIL_API_BASE_URL`          | `https://api.resend.com`             |
    /// | `MAIL_FROM`                  | `Concierge <noreply@example.com>`    |
    /// | `CONTACT_EMAIL`, `WHATSAPP_NUMBER`, `WECHAT_ID`, `LINE_ID`, `FORM_SERVICE_ID` | empty |
    /// | `GA_MEASUREMENT_ID`, `CLARITY_PROJECT_ID` | unset                   |
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("BIND_ADDR", "127.0.0.1:3000"),
            production: env_opt("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production")),
            session_secret: resolve_session_secret(),
            setup_path: env_or("SETUP_PATH", "/setup"),
            notion_base_url: env_or("NOTION_API_BASE_URL", DEFAULT_NOTION_BASE_URL),
            crm: CrmConfig {
                api_key: env_opt("NOTION_API_KEY"),
                database_id: env_opt("NOTION_INQUIRY_DATABASE_ID"),
            },
            mail: MailConfig {
                api_key: env_opt("MAIL_API_KEY"),
                base_url: env_or("MAIL_API_BASE_URL", DEFAULT_MAIL_BASE_URL),
                from: env_or("MAIL_FROM", "Concierge <noreply@example.com>"),
            },
            site: SiteConfig {
                contact_email: env_or("CONTACT_EMAIL", ""),
                whatsapp_number: env_or("WHATSAPP_NUMBER", ""),
                wechat_id: env_or("WECHAT_ID", ""),
                line_id: env_or("LINE_ID", ""),
                form_service_id: env_or("FORM_SERVICE_ID", ""),
                ga_measurement_id: env_opt("GA_MEASUREMENT_ID"),
                clarity_project_id: env_opt("CLARITY_PROJECT_ID"),
            },
        }
    }

    /// Development defaults with the given signing secret; nothing external configured.
    pub fn local(session_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".into(),
            production: false,
            session_secret: session_secret.into(),
            setup_path: "/setup".into(),
            notion_base_url: DEFAULT_NOTION_BASE_URL.into(),
            crm: CrmConfig::default(),
            mail: MailConfig {
                api_key: None,
                base_url: DEFAULT_MAIL_BASE_URL.into(),
                from: "Concierge <noreply@example.com>".into(),
            },
            site: SiteConfig::default(),
        }
    }
}

/// Non-empty environment variable.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}
