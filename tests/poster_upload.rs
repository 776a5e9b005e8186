mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;

use cinema_system::{controllers::posters, models::Role};
use common::{body_json, TestState};

const BOUNDARY: &str = "cinema-test-boundary";

fn app(state: TestState) -> Router {
    let limit = state.upload.max_poster_bytes;
    posters::routes(limit).with_state(state)
}

fn multipart_body(field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload(token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/upload-poster")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn admin_upload_is_saved_under_sanitized_name() {
    let dir = tempfile::tempdir().unwrap();
    let state = TestState::new(dir.path());
    let token = state.bearer(Role::Admin);

    let response = app(state)
        .oneshot(upload(Some(&token), multipart_body("poster", "Blade Runner.PNG", b"\x89PNG")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "url": "/posters/BladeRunner.png" }));
    assert_eq!(std::fs::read(dir.path().join("BladeRunner.png")).unwrap(), b"\x89PNG");
}

#[tokio::test]
async fn upload_requires_admin() {
    let dir = tempfile::tempdir().unwrap();
    let state = TestState::new(dir.path());

    let response = app(state.clone())
        .oneshot(upload(None, multipart_body("poster", "a.png", b"x")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = state.bearer(Role::Cashier);
    let response = app(state)
        .oneshot(upload(Some(&token), multipart_body("poster", "a.png", b"x")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_image_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = TestState::new(dir.path());
    let token = state.bearer(Role::Admin);

    let response = app(state)
        .oneshot(upload(Some(&token), multipart_body("poster", "evil.exe", b"MZ")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "allowed: jpg, png, gif, webp" }));
    assert!(!dir.path().join("evil.exe").exists());
}

#[tokio::test]
async fn missing_poster_field_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let state = TestState::new(dir.path());
    let token = state.bearer(Role::Admin);

    let response = app(state)
        .oneshot(upload(Some(&token), multipart_body("cover", "a.png", b"x")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "missing file field 'poster'" }));
}

#[tokio::test]
async fn poster_field_without_file_name_is_not_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let state = TestState::new(dir.path());
    let token = state.bearer(Role::Admin);
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"poster\"\r\n\r\nnot a file\r\n--{BOUNDARY}--\r\n"
    )
    .into_bytes();

    let response = app(state).oneshot(upload(Some(&token), body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "missing file field 'poster'" }));
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = TestState::new(dir.path());
    let token = state.bearer(Role::Admin);
    let big = vec![0u8; state.upload.max_poster_bytes + 1];

    let response = app(state)
        .oneshot(upload(Some(&token), multipart_body("poster", "big.png", &big)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "invalid form or file too large" }));
}
