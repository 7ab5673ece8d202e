//! Requests axum cannot parse must still get the JSON error envelope.
//!
//! Every request here is rejected before a query runs.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, get, post_multipart, post_raw, test_config, unreachable_pool,
    FakeImageHost,
};
use senso_media::ImageHost;
use serde_json::Value;

fn app() -> axum::Router {
    common::build_test_app(unreachable_pool())
}

fn assert_envelope(json: &Value, code: &str) {
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], code);
    assert!(
        json["error"].as_str().is_some_and(|e| !e.is_empty()),
        "error message missing: {json}"
    );
}

#[tokio::test]
async fn malformed_login_json_is_enveloped() {
    let response = post_raw(
        app(),
        "/api/admin/login",
        "application/json",
        "{not json",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_envelope(&body_json(response).await, "BAD_REQUEST");
}

#[tokio::test]
async fn login_without_json_content_type_is_enveloped() {
    let response = post_raw(app(), "/api/admin/login", "text/plain", "hunter2", None).await;

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_envelope(&body_json(response).await, "UNSUPPORTED_MEDIA_TYPE");
}

#[tokio::test]
async fn wrongly_typed_product_body_is_enveloped() {
    let response = post_raw(
        app(),
        "/api/products",
        "application/json",
        r#"{"name": 42}"#,
        Some(&admin_token()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_envelope(&body_json(response).await, "VALIDATION_ERROR");
}

#[tokio::test]
async fn non_numeric_product_id_is_enveloped() {
    let response = get(app(), "/api/products/not-a-number").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_envelope(&body_json(response).await, "BAD_REQUEST");
}

#[tokio::test]
async fn non_numeric_limit_is_enveloped() {
    let response = get(app(), "/api/products?limit=lots").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_envelope(&body_json(response).await, "BAD_REQUEST");
}

#[tokio::test]
async fn upload_without_multipart_body_is_enveloped() {
    let response = post_raw(
        app(),
        "/api/upload",
        "application/json",
        "{}",
        Some(&admin_token()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_envelope(&body_json(response).await, "BAD_REQUEST");
}

#[tokio::test]
async fn upload_over_body_limit_reports_payload_too_large() {
    let mut config = test_config();
    config.upload_max_bytes = 16;
    let host = Arc::new(FakeImageHost::default());
    let app = common::build_test_app_with(
        config,
        unreachable_pool(),
        Some(Arc::clone(&host) as Arc<dyn ImageHost>),
    );

    let response = post_multipart(
        app,
        "/api/upload",
        "file",
        "huge.png",
        &vec![0u8; 128 * 1024],
        Some(&admin_token()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_envelope(&body_json(response).await, "PAYLOAD_TOO_LARGE");
    assert!(host.received().is_empty());
}
