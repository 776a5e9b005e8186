#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::FromRef,
    http::Response,
};
use fake::{faker::internet::en::SafeEmail, faker::name::en::Name, Fake};

use cinema_system::{
    config::{JwtConfig, UploadConfig},
    middleware::JwtKeys,
    models::{Role, User},
};

/// Minimal state for routers that only need auth and upload settings.
#[derive(Clone)]
pub struct TestState {
    pub jwt: JwtKeys,
    pub upload: UploadConfig,
}

impl FromRef<TestState> for JwtKeys {
    fn from_ref(state: &TestState) -> Self {
        state.jwt.clone()
    }
}

impl FromRef<TestState> for UploadConfig {
    fn from_ref(state: &TestState) -> Self {
        state.upload.clone()
    }
}

impl TestState {
    pub fn new(posters_dir: &std::path::Path) -> Self {
        Self {
            jwt: JwtKeys::from_config(&JwtConfig {
                secret: "test-secret".to_string(),
                expires_in_hours: 1,
            }),
            upload: UploadConfig {
                posters_dir: posters_dir.to_string_lossy().into_owned(),
                max_poster_bytes: 64 * 1024,
            },
        }
    }

    pub fn bearer(&self, role: Role) -> String {
        let user = User {
            id: (1..1000).fake(),
            email: SafeEmail().fake(),
            password_hash: String::new(),
            name: Name().fake(),
            role,
            avatar_url: String::new(),
        };
        format!("Bearer {}", self.jwt.issue(&user).unwrap())
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
