use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{EmailMessage, MailClient, MailError};

/// Client for a Resend-compatible `POST /emails` API.
pub struct HttpMailClient {
    client: Client,
    base_url: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

impl HttpMailClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Result<Self, MailError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(MailError::Config("mail API key is empty".into()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| MailError::Config(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            from: from.into(),
        })
    }
}

#[async_trait]
impl MailClient for HttpMailClient {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        if message.body_html.is_none() && message.body_text.is_none() {
            return Err(MailError::Config(
                "Email must have either HTML or text body".into(),
            ));
        }

        let email = OutgoingEmail {
            from: &self.from,
            to: vec![message.to.as_str()],
            subject: &message.subject,
            html: message.body_html.as_deref(),
            text: message.body_text.as_deref(),
            reply_to: message.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&email)
            .send()
            .await
            .map_err(|e| MailError::Provider(format!("failed to send email: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Provider(format!("mail API error: {status} - {body}")));
        }

        Ok(())
    }

    fn from_address(&self) -> &str {
        &self.from
    }
}
