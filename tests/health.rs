mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;

use cinema_system::controllers::health;

#[tokio::test]
async fn health_reports_ok() {
    let app: Router = health::routes().with_state(());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_json(response).await, json!({ "status": "ok" }));
}
