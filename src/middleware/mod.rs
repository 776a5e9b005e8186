use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    config::JwtConfig,
    error::AppError,
    models::{Role, User},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub exp: i64,
}

/// HS256 keys derived from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn from_config(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::hours(config.expires_in_hours),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user.id,
            role: user.role,
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        Ok(decode::<Claims>(token, &self.decoding, &validation)?.claims)
    }
}

/// Caller identified by a valid `Authorization: Bearer <jwt>` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: Role,
}

impl AuthUser {
    pub fn require_any(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::forbidden("forbidden"))
        }
    }

    /// Owners see their own records, cashiers and admins see everyone's.
    pub fn can_access(&self, owner_id: i64) -> bool {
        self.user_id == owner_id || self.role.is_staff()
    }
}

// Bearer JWT extractor
impl<S> FromRequestParts<S> for AuthUser
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthorized("missing or invalid Authorization header"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys
            .verify(token)
            .map_err(|_| AppError::unauthorized("invalid token"))?;

        Ok(AuthUser { user_id: claims.sub, role: claims.role })
    }
}

/// Admin-only routes.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require_any(&[Role::Admin])?;
        Ok(AdminUser(user))
    }
}

/// Cashier or admin.
#[derive(Debug, Clone, Copy)]
pub struct StaffUser(pub AuthUser);

impl<S> FromRequestParts<S> for StaffUser
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_staff() {
            return Err(AppError::forbidden("forbidden: admin or cashier only"));
        }
        Ok(StaffUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    fn keys(secret: &str, hours: i64) -> JwtKeys {
        JwtKeys::from_config(&JwtConfig { secret: secret.to_string(), expires_in_hours: hours })
    }

    fn user(role: Role) -> User {
        User {
            id: 42,
            email: "cashier".to_string(),
            password_hash: String::new(),
            name: "Cashier".to_string(),
            role,
            avatar_url: String::new(),
        }
    }

    async fn extract(keys: &JwtKeys, auth: Option<&str>) -> Result<AuthUser, AppError> {
        let mut builder = Request::builder().uri("/api/me");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, keys).await
    }

    #[test]
    fn issued_token_carries_id_and_role() {
        let keys = keys("secret", 24);
        let token = keys.issue(&user(Role::Cashier)).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Cashier);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = keys("one", 24).issue(&user(Role::Admin)).unwrap();
        assert!(keys("two", 24).verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys("secret", -2);
        let token = keys.issue(&user(Role::Customer)).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn bearer_header_is_required() {
        let keys = keys("secret", 24);
        let err = extract(&keys, None).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "missing or invalid Authorization header");

        let err = extract(&keys, Some("Basic YWRtaW46MTIzNA==")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let err = extract(&keys, Some("Bearer nonsense")).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid token");
    }

    #[tokio::test]
    async fn valid_bearer_token_is_extracted() {
        let keys = keys("secret", 24);
        let token = keys.issue(&user(Role::Customer)).unwrap();
        let auth = extract(&keys, Some(&format!("Bearer {token}"))).await.unwrap();
        assert_eq!(auth.user_id, 42);
        assert_eq!(auth.role, Role::Customer);
    }

    #[test]
    fn role_gates() {
        let customer = AuthUser { user_id: 1, role: Role::Customer };
        let cashier = AuthUser { user_id: 2, role: Role::Cashier };

        assert_eq!(customer.require_any(&[Role::Admin]).unwrap_err().status(), StatusCode::FORBIDDEN);
        assert!(cashier.require_any(&[Role::Cashier, Role::Admin]).is_ok());

        assert!(customer.can_access(1));
        assert!(!customer.can_access(2));
        assert!(cashier.can_access(1));
    }
}
