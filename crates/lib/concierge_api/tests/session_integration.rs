//! Session gate: issuing, reading, expiring and destroying the cookie session.

mod common;

use axum::http::{StatusCode, header};
use chrono::Duration;
use common::{Harness, VALID_KEY, body_json, empty_request, json_request, set_cookie_headers};
use concierge_api::config::ApiConfig;
use serde_json::json;

#[tokio::test]
async fn valid_key_sets_http_only_cookie() {
    let h = Harness::new();
    let resp = h
        .send(json_request("POST", "/api/auth/session", &json!({"apiKey": VALID_KEY}), None))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookies = set_cookie_headers(&resp);
    let cookie = cookies
        .iter()
        .find(|c| c.starts_with("notion-auth-token="))
        .expect("session cookie");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=604800"));
    assert!(!cookie.contains("Secure"), "no Secure flag outside production");
    assert!(!cookie.contains(VALID_KEY), "key must not appear in the cookie");

    assert_eq!(body_json(resp).await, json!({"success": true}));
    assert_eq!(h.workspace.count("me"), 1);
}

#[tokio::test]
async fn production_cookie_is_secure() {
    let mut config = ApiConfig::local(common::SESSION_SECRET);
    config.production = true;
    let h = Harness::build(config, None);
    let resp = h
        .send(json_request("POST", "/api/auth/session", &json!({"apiKey": VALID_KEY}), None))
        .await;
    let cookies = set_cookie_headers(&resp);
    assert!(cookies.iter().any(|c| c.contains("Secure")));
}

#[tokio::test]
async fn invalid_key_is_rejected_without_cookie() {
    let h = Harness::new();
    let resp = h
        .send(json_request("POST", "/api/auth/session", &json!({"apiKey": "secret_wrong"}), None))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(common::session_cookie_pair(&resp).is_none());

    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid API key");
}

#[tokio::test]
async fn upstream_outage_during_verification_is_reported_as_invalid_key() {
    let h = Harness::new();
    h.workspace.fail("me");
    let resp = h
        .send(json_request("POST", "/api/auth/session", &json!({"apiKey": VALID_KEY}), None))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["error"], "Invalid API key");
}

#[tokio::test]
async fn blank_or_missing_key_never_reaches_upstream() {
    let h = Harness::new();
    for body in [json!({"apiKey": "   "}), json!({}), json!("nonsense")] {
        let resp = h.send(json_request("POST", "/api/auth/session", &body, None)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
    assert_eq!(h.workspace.count("me"), 0);
}

#[tokio::test]
async fn status_reflects_cookie() {
    let h = Harness::new();
    let resp = h.send(empty_request("GET", "/api/auth/session", None)).await;
    assert_eq!(body_json(resp).await, json!({"authenticated": false}));

    let cookie = h.login(VALID_KEY).await.expect("cookie");
    let resp = h.send(empty_request("GET", "/api/auth/session", Some(&cookie))).await;
    assert_eq!(body_json(resp).await, json!({"authenticated": true}));
}

#[tokio::test]
async fn session_expires_after_seven_days() {
    let h = Harness::new();
    let cookie = h.login(VALID_KEY).await.expect("cookie");

    h.clock.advance(Duration::days(7) - Duration::seconds(1));
    let resp = h.send(empty_request("GET", "/api/auth/session", Some(&cookie))).await;
    assert_eq!(body_json(resp).await["authenticated"], true);

    h.clock.advance(Duration::seconds(1));
    let resp = h.send(empty_request("GET", "/api/auth/session", Some(&cookie))).await;
    assert_eq!(body_json(resp).await["authenticated"], false);
}

#[tokio::test]
async fn cookie_signed_with_another_secret_is_ignored() {
    let other = Harness::build(ApiConfig::local("another-secret"), None);
    let cookie = other.login(VALID_KEY).await.expect("cookie");

    let h = Harness::new();
    let resp = h.send(empty_request("GET", "/api/notion/databases", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_cookie_is_no_session() {
    let h = Harness::new();
    let resp = h
        .send(empty_request("GET", "/api/auth/session", Some("notion-auth-token=not.a.jwt")))
        .await;
    assert_eq!(body_json(resp).await["authenticated"], false);
}

#[tokio::test]
async fn protected_page_redirects_to_setup() {
    let h = Harness::new();
    let resp = h.send(empty_request("GET", "/workspace", None)).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers()[header::LOCATION], "/setup");
}

#[tokio::test]
async fn protected_api_returns_unauthorized_envelope() {
    let h = Harness::new();
    let resp = h.send(empty_request("GET", "/api/notion/pages", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(resp).await,
        json!({
            "success": false,
            "data": null,
            "error": "Unauthorized",
            "errorKind": "unauthorized",
        })
    );
    assert!(h.workspace.calls().is_empty());
}

#[tokio::test]
async fn logout_clears_cookie_and_session() {
    let h = Harness::new();
    let cookie = h.login(VALID_KEY).await.expect("cookie");

    for (method, uri) in [("DELETE", "/api/auth/session"), ("POST", "/api/auth/logout")] {
        let resp = h.send(empty_request(method, uri, Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cleared = set_cookie_headers(&resp);
        assert!(
            cleared
                .iter()
                .any(|c| c.starts_with("notion-auth-token=;") && c.contains("Max-Age=0")),
            "expected an expired cookie, got {cleared:?}"
        );
        assert_eq!(body_json(resp).await, json!({"success": true}));
    }
}

#[tokio::test]
async fn public_routes_need_no_session() {
    let h = Harness::new();
    let resp = h.send(empty_request("GET", "/api/health", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());

    let resp = h.send(empty_request("GET", "/api/site-config", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["contactEmail"], "hello@concierge.example");
    assert_eq!(body["languages"], json!(["en", "zh"]));
    assert!(body.get("gaMeasurementId").is_none());
}
