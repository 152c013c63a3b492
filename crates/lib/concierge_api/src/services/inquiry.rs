//! Inquiry fan-out: CRM write plus two emails, run concurrently.
//!
//! None of the side effects can fail the submission. Each one reports
//! whether it happened; failures are logged and swallowed.

use concierge_core::inquiry::Inquiry;
use concierge_core::mail::{EmailMessage, templates};
use tracing::{info, warn};

use crate::AppState;

/// Which side effects of a submission actually happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub crm_recorded: bool,
    pub notification_sent: bool,
    pub confirmation_sent: bool,
}

/// Run the three inquiry side effects and report the outcome.
pub async fn submit(state: &AppState, inquiry: &Inquiry) -> FanOutReport {
    let (crm_recorded, notification_sent, confirmation_sent) = tokio::join!(
        record_in_crm(state, inquiry),
        notify_team(state, inquiry),
        confirm_to_customer(state, inquiry),
    );

    let report = FanOutReport {
        crm_recorded,
        notification_sent,
        confirmation_sent,
    };
    info!(
        crm = report.crm_recorded,
        notification = report.notification_sent,
        confirmation = report.confirmation_sent,
        language = inquiry.language.code(),
        "inquiry processed"
    );
    report
}

async fn record_in_crm(state: &AppState, inquiry: &Inquiry) -> bool {
    let crm = &state.config.crm;
    let (Some(api_key), Some(database_id)) = (crm.api_key.as_deref(), crm.database_id.as_deref())
    else {
        warn!("CRM not configured, inquiry not recorded");
        return false;
    };

    let body = inquiry.to_crm_page(database_id);
    match state.notion.connect(api_key).create_page(&body).await {
        Ok(_) => true,
        Err(e) => {
            warn!(kind = ?e.kind(), error = %e, "failed to record inquiry in CRM");
            false
        }
    }
}

async fn notify_team(state: &AppState, inquiry: &Inquiry) -> bool {
    let to = state.config.site.contact_email.trim();
    if to.is_empty() {
        warn!("CONTACT_EMAIL not set, inquiry notification skipped");
        return false;
    }

    let (subject, html, text) = templates::inquiry_notification(inquiry);
    let reply_to = Some(inquiry.email.trim().to_string()).filter(|e| !e.is_empty());
    send(
        state,
        "notification",
        EmailMessage {
            to: to.to_string(),
            subject,
            body_html: Some(html),
            body_text: Some(text),
            reply_to,
        },
    )
    .await
}

async fn confirm_to_customer(state: &AppState, inquiry: &Inquiry) -> bool {
    let to = inquiry.email.trim();
    if to.is_empty() {
        warn!("inquiry has no email, confirmation skipped");
        return false;
    }

    let (subject, html, text) =
        templates::inquiry_confirmation(inquiry, &state.config.site.contact_email);
    send(
        state,
        "confirmation",
        EmailMessage {
            to: to.to_string(),
            subject,
            body_html: Some(html),
            body_text: Some(text),
            reply_to: contact_reply_to(&state.config.site.contact_email),
        },
    )
    .await
}

/// Replies to a confirmation go to the team when a contact address is set.
fn contact_reply_to(contact_email: &str) -> Option<String> {
    let contact = contact_email.trim();
    (!contact.is_empty()).then(|| contact.to_string())
}

async fn send(state: &AppState, email: &'static str, message: EmailMessage) -> bool {
    let Some(mailer) = state.mailer.as_ref() else {
        warn!(email, "mail not configured, email skipped");
        return false;
    };
    match mailer.send(message).await {
        Ok(()) => true,
        Err(e) => {
            warn!(email, error = %e, "failed to send email");
            false
        }
    }
}
