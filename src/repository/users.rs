use sqlx::PgPool;

use crate::models::{Role, User};

const COLUMNS: &str = "id, email, password_hash, name, role, avatar_url";

/// Fields written by a profile update; `password_hash` is only replaced when set.
#[derive(Debug, Clone)]
pub struct ProfileFields {
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub password_hash: Option<String>,
}

// Репозиторий пользователей
#[derive(Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, email: &str, password_hash: &str, name: &str, role: Role) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, name, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_by_email(&self, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    /// Names for a batch of user ids, used to label booking lists.
    pub async fn names_by_ids(&self, ids: &[i64]) -> sqlx::Result<Vec<(i64, String)>> {
        sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn update_profile(&self, id: i64, fields: &ProfileFields) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET name = $2, email = $3, avatar_url = $4, password_hash = COALESCE($5, password_hash)
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.avatar_url)
        .bind(&fields.password_hash)
        .fetch_optional(&self.pool)
        .await
    }
}
