//! Transactional email.

mod http;
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpMailClient;

/// Default base URL of the mail REST API.
pub const DEFAULT_MAIL_BASE_URL: &str = "https://api.resend.com";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail configuration error: {0}")]
    Config(String),

    #[error("Mail provider error: {0}")]
    Provider(String),
}

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_html: Option<String>,
    pub body_text: Option<String>,
    pub reply_to: Option<String>,
}

#[async_trait]
pub trait MailClient: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
    fn from_address(&self) -> &str;
}

pub type DynMailClient = Arc<dyn MailClient>;
