mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use cinema_system::{
    middleware::{AdminUser, AuthUser, StaffUser},
    models::Role,
};
use common::{body_json, TestState};

async fn whoami(user: AuthUser) -> Json<Value> {
    Json(json!({ "role": user.role }))
}

async fn admin_only(_admin: AdminUser) -> &'static str {
    "ok"
}

async fn staff_only(_staff: StaffUser) -> &'static str {
    "ok"
}

fn app(state: TestState) -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .route("/admin", get(admin_only))
        .route("/staff", get(staff_only))
        .with_state(state)
}

fn request(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = auth {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(TestState::new(dir.path()))
        .oneshot(request("/whoami", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "missing or invalid Authorization header" })
    );
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(TestState::new(dir.path()))
        .oneshot(request("/whoami", Some("Bearer not.a.jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "error": "invalid token" }));
}

#[tokio::test]
async fn valid_token_reaches_handler() {
    let dir = tempfile::tempdir().unwrap();
    let state = TestState::new(dir.path());
    let token = state.bearer(Role::Cashier);

    let response = app(state).oneshot(request("/whoami", Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "role": "cashier" }));
}

#[tokio::test]
async fn customers_are_kept_out_of_admin_and_staff_routes() {
    let dir = tempfile::tempdir().unwrap();
    let state = TestState::new(dir.path());
    let token = state.bearer(Role::Customer);

    let response = app(state.clone()).oneshot(request("/admin", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await, json!({ "error": "forbidden" }));

    let response = app(state).oneshot(request("/staff", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "forbidden: admin or cashier only" })
    );
}

#[tokio::test]
async fn cashier_passes_staff_gate_but_not_admin_gate() {
    let dir = tempfile::tempdir().unwrap();
    let state = TestState::new(dir.path());
    let token = state.bearer(Role::Cashier);

    let response = app(state.clone()).oneshot(request("/staff", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(state).oneshot(request("/admin", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
