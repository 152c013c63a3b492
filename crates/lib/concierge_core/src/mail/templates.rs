//! Inquiry email templates. Each returns `(subject, html, text)`.

use crate::i18n::{self, Language};
use crate::inquiry::Inquiry;

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn rows_html(rows: &[(&str, &str)]) -> String {
    rows.iter()
        .map(|(label, value)| {
            format!(
                r#"<tr><td style="padding: 6px 12px; color: #6b7280; font-size: 14px; white-space: nowrap;">{}</td><td style="padding: 6px 12px; color: #111827; font-size: 14px;">{}</td></tr>"#,
                escape_html(label),
                escape_html(value)
            )
        })
        .collect()
}

fn rows_text(rows: &[(&str, &str)]) -> String {
    rows.iter()
        .map(|(label, value)| format!("{label}: {value}\n"))
        .collect()
}

fn layout(lang: Language, title: &str, content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'PingFang SC', 'Microsoft YaHei', Arial, sans-serif; background-color: #f8f7f4;">
    <table role="presentation" style="width: 100%; border-collapse: collapse;">
        <tr>
            <td style="padding: 32px 16px;">
                <table role="presentation" style="max-width: 600px; margin: 0 auto; background: #ffffff; border-radius: 12px; border: 1px solid #e5e7eb;">
                    <tr>
                        <td style="padding: 32px;">
                            {content}
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"##,
        lang = lang.code(),
        title = escape_html(title),
    )
}

/// Internal notification sent to the business contact address.
pub fn inquiry_notification(inquiry: &Inquiry) -> (String, String, String) {
    let subject = format!(
        "New inquiry: {} ({})",
        inquiry.name.trim(),
        inquiry.service_interest.trim()
    );

    let mut rows: Vec<(&str, &str)> = vec![
        ("Name", inquiry.name.as_str()),
        ("Email", inquiry.email.as_str()),
        ("Phone", inquiry.phone.as_str()),
        ("Nationality", inquiry.nationality.as_str()),
        ("Service interest", inquiry.service_interest.as_str()),
        ("Travel date", inquiry.travel_date.as_str()),
        ("Preferred contact", inquiry.preferred_contact.as_str()),
        ("Language", inquiry.language.code()),
    ];
    if let Some(budget) = inquiry.budget() {
        rows.push(("Budget", budget));
    }

    let message_html = inquiry
        .message()
        .map(|m| {
            format!(
                r#"<h2 style="margin: 24px 0 8px; font-size: 16px; color: #111827;">Message</h2><p style="margin: 0; font-size: 14px; line-height: 1.6; color: #374151; white-space: pre-wrap;">{}</p>"#,
                escape_html(m)
            )
        })
        .unwrap_or_default();

    let content = format!(
        r#"<h1 style="margin: 0 0 16px; font-size: 22px; color: #111827;">New inquiry received</h1>
                            <table role="presentation" style="border-collapse: collapse;">{}</table>
                            {message_html}"#,
        rows_html(&rows)
    );
    let html = layout(Language::En, &subject, &content);

    let mut text = format!("New inquiry received\n\n{}", rows_text(&rows));
    if let Some(m) = inquiry.message() {
        text.push_str(&format!("\nMessage:\n{m}\n"));
    }

    (subject, html, text)
}

/// Confirmation sent to the customer, in their language.
pub fn inquiry_confirmation(inquiry: &Inquiry, contact_email: &str) -> (String, String, String) {
    let m = i18n::messages(inquiry.language);
    let subject = m.confirmation_subject.to_string();
    let name = inquiry.name.trim();

    let rows: [(&str, &str); 3] = [
        (m.field_service, inquiry.service_interest.as_str()),
        (m.field_travel_date, inquiry.travel_date.as_str()),
        (m.field_preferred_contact, inquiry.preferred_contact.as_str()),
    ];

    let greeting = match inquiry.language {
        Language::Zh => format!("{}{}：", m.confirmation_greeting, name),
        Language::En => format!("{} {},", m.confirmation_greeting, name),
    };

    let contact_html = if contact_email.trim().is_empty() {
        String::new()
    } else {
        let email = escape_html(contact_email.trim());
        format!(
            r#"<p style="margin: 24px 0 0; font-size: 14px; color: #6b7280;">{} <a href="mailto:{email}" style="color: #0f766e;">{email}</a></p>"#,
            escape_html(m.confirmation_contact)
        )
    };

    let content = format!(
        r#"<p style="margin: 0 0 16px; font-size: 16px; color: #111827;">{greeting}</p>
                            <p style="margin: 0 0 24px; font-size: 15px; line-height: 1.7; color: #374151;">{body}</p>
                            <h2 style="margin: 0 0 8px; font-size: 15px; color: #111827;">{summary}</h2>
                            <table role="presentation" style="border-collapse: collapse;">{rows}</table>
                            {contact_html}
                            <p style="margin: 24px 0 0; font-size: 14px; color: #374151;">{signoff}</p>"#,
        greeting = escape_html(&greeting),
        body = escape_html(m.confirmation_body),
        summary = escape_html(m.confirmation_summary),
        rows = rows_html(&rows),
        signoff = escape_html(m.confirmation_signoff),
    );
    let html = layout(inquiry.language, &subject, &content);

    let mut text = format!(
        "{greeting}\n\n{}\n\n{}\n{}",
        m.confirmation_body,
        m.confirmation_summary,
        rows_text(&rows)
    );
    if !contact_email.trim().is_empty() {
        text.push_str(&format!("\n{} {}\n", m.confirmation_contact, contact_email.trim()));
    }
    text.push_str(&format!("\n{}\n", m.confirmation_signoff));

    (subject, html, text)
}
