//! Inquiry intake: fan-out to CRM and mail never fails the submission.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{FakeMailer, Harness, VALID_KEY, body_json, json_request};
use concierge_api::config::ApiConfig;
use concierge_api::services::inquiry::{FanOutReport, submit};
use concierge_core::inquiry::Inquiry;
use serde_json::{Value, json};

fn jane() -> Value {
    json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "phone": "+1 555 0100",
        "nationality": "Canadian",
        "serviceInterest": "Dental",
        "travelDate": "2026-05-12",
        "preferredContact": "whatsapp",
    })
}

fn crm_configured(mailer: Option<Arc<FakeMailer>>) -> Harness {
    let mut config = ApiConfig::local(common::SESSION_SECRET);
    config.site.contact_email = "hello@concierge.example".into();
    config.crm.api_key = Some(VALID_KEY.into());
    config.crm.database_id = Some("crm-db".into());
    Harness::build(config, mailer)
}

#[tokio::test]
async fn jane_inquiry_is_recorded_and_acknowledged() {
    let mailer = Arc::new(FakeMailer::default());
    let h = crm_configured(Some(mailer.clone()));

    let resp = h.send(json_request("POST", "/api/inquiry", &jane(), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(!body["message"].as_str().unwrap().is_empty());

    let pages = h.workspace.created_pages();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0]["parent"]["database_id"], "crm-db");
    assert_eq!(pages[0]["properties"]["Email"]["email"], "jane@example.com");
    assert_eq!(pages[0]["properties"]["Status"]["select"]["name"], "New");
    assert_eq!(
        pages[0]["properties"]["Travel Date"]["date"]["start"],
        "2026-05-12"
    );

    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);
    let notification = sent
        .iter()
        .find(|m| m.to == "hello@concierge.example")
        .expect("team notification");
    assert_eq!(notification.reply_to.as_deref(), Some("jane@example.com"));
    assert!(notification.subject.contains("Jane Doe"));
    let confirmation = sent
        .iter()
        .find(|m| m.to == "jane@example.com")
        .expect("customer confirmation");
    assert_eq!(
        confirmation.reply_to.as_deref(),
        Some("hello@concierge.example")
    );
}

#[tokio::test]
async fn confirmation_without_contact_has_no_reply_to() {
    let mailer = Arc::new(FakeMailer::default());
    let mut config = ApiConfig::local(common::SESSION_SECRET);
    config.site.contact_email = "   ".into();
    let h = Harness::build(config, Some(mailer.clone()));

    let inquiry: Inquiry = serde_json::from_value(jane()).unwrap();
    let report = submit(&h.state, &inquiry).await;
    assert!(!report.notification_sent);
    assert!(report.confirmation_sent);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "jane@example.com");
    assert!(sent[0].reply_to.is_none());
}

#[tokio::test]
async fn chinese_inquiry_gets_chinese_acknowledgement() {
    let h = crm_configured(Some(Arc::new(FakeMailer::default())));
    let mut inquiry = jane();
    inquiry["language"] = json!("zh-CN");

    let resp = h.send(json_request("POST", "/api/inquiry", &inquiry, None)).await;
    let body = body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("感谢"));
}

#[tokio::test]
async fn failing_crm_and_mail_still_succeed() {
    let h = crm_configured(Some(Arc::new(FakeMailer::failing())));
    h.workspace.fail("create_page");

    let resp = h.send(json_request("POST", "/api/inquiry", &jane(), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn unconfigured_side_effects_are_skipped() {
    let h = Harness::new();
    let inquiry: Inquiry = serde_json::from_value(jane()).unwrap();
    let report = submit(&h.state, &inquiry).await;
    assert_eq!(report, FanOutReport::default());
    assert!(h.workspace.calls().is_empty());
}

#[tokio::test]
async fn report_tracks_each_side_effect() {
    let mailer = Arc::new(FakeMailer::default());
    let h = crm_configured(Some(mailer));
    h.workspace.fail("create_page");
    let inquiry: Inquiry = serde_json::from_value(jane()).unwrap();

    let report = submit(&h.state, &inquiry).await;
    assert_eq!(
        report,
        FanOutReport {
            crm_recorded: false,
            notification_sent: true,
            confirmation_sent: true,
        }
    );
}

#[tokio::test]
async fn malformed_body_is_a_server_error() {
    let h = crm_configured(Some(Arc::new(FakeMailer::default())));
    let req = Request::builder()
        .method("POST")
        .uri("/api/inquiry")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let resp = h.send(req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());
    assert!(h.workspace.created_pages().is_empty());
}

#[tokio::test]
async fn missing_required_field_is_a_server_error() {
    let h = Harness::new();
    let mut inquiry = jane();
    inquiry.as_object_mut().unwrap().remove("email");
    let resp = h.send(json_request("POST", "/api/inquiry", &inquiry, None)).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
