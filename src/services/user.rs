use thiserror::Error;
use tokio::task;
use tracing::info;

use crate::{
    error::AppError,
    models::{Role, User},
    repository::{users::ProfileFields, UserRepo},
};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("email already in use")]
    EmailInUse,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user not found")]
    NotFound,

    #[error("current password is required to set a new password")]
    CurrentPasswordRequired,

    #[error("current password is incorrect")]
    CurrentPasswordIncorrect,

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("password hashing task failed: {0}")]
    Task(#[from] task::JoinError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidCredentials => AppError::unauthorized(err.to_string()),
            UserError::NotFound => AppError::not_found(err.to_string()),
            UserError::EmailInUse
            | UserError::CurrentPasswordRequired
            | UserError::CurrentPasswordIncorrect => AppError::bad_request(err.to_string()),
            UserError::Database(e) => AppError::from(e),
            UserError::Hash(e) => AppError::Internal(e.into()),
            UserError::Task(e) => AppError::Internal(e.into()),
        }
    }
}

/// Profile changes; empty strings keep the current value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub current_password: String,
    pub new_password: String,
}

/// bcrypt is CPU-bound, so hashing runs on the blocking pool.
async fn hash_password(password: &str) -> Result<String, UserError> {
    let password = password.to_string();
    Ok(task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST)).await??)
}

async fn verify_password(user: &User, password: &str) -> Result<bool, UserError> {
    let user = user.clone();
    let password = password.to_string();
    Ok(task::spawn_blocking(move || user.verify_password(&password)).await?)
}

#[derive(Clone)]
pub struct UserService {
    users: UserRepo,
}

impl UserService {
    pub fn new(users: UserRepo) -> Self {
        Self { users }
    }

    // Создаёт пользователя с заданной ролью, если такого email ещё нет
    pub async fn ensure_user_with_role(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> Result<(), UserError> {
        if email.is_empty() || password.is_empty() {
            return Ok(());
        }
        if self.users.get_by_email(email).await?.is_some() {
            return Ok(());
        }

        let hash = hash_password(password).await?;
        self.users.create(email, &hash, name, role).await?;
        info!("Default {} user '{}' created", role.as_str(), email);
        Ok(())
    }

    /// Registration only ever creates customers.
    pub async fn register_customer(&self, name: &str, email: &str, password: &str) -> Result<User, UserError> {
        if self.users.get_by_email(email).await?.is_some() {
            return Err(UserError::EmailInUse);
        }
        let hash = hash_password(password).await?;
        let user = self
            .users
            .create(email, &hash, name, Role::Customer)
            .await
            .map_err(unique_email)?;
        info!("User {} registered", user.id);
        Ok(user)
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, UserError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;
        if !verify_password(&user, password).await? {
            return Err(UserError::InvalidCredentials);
        }
        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, UserError> {
        Ok(self.users.get_by_id(id).await?)
    }

    pub async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<User, UserError> {
        let user = self.users.get_by_id(id).await?.ok_or(UserError::NotFound)?;

        let name = non_empty_or(update.name, &user.name);
        let avatar_url = non_empty_or(update.avatar_url, &user.avatar_url);

        let mut email = user.email.clone();
        if !update.email.is_empty() && update.email != user.email {
            if let Some(existing) = self.users.get_by_email(&update.email).await? {
                if existing.id != user.id {
                    return Err(UserError::EmailInUse);
                }
            }
            email = update.email;
        }

        let password_hash = if update.new_password.is_empty() {
            None
        } else {
            if update.current_password.is_empty() {
                return Err(UserError::CurrentPasswordRequired);
            }
            if !verify_password(&user, &update.current_password).await? {
                return Err(UserError::CurrentPasswordIncorrect);
            }
            Some(hash_password(&update.new_password).await?)
        };

        let fields = ProfileFields { name, email, avatar_url, password_hash };
        self.users
            .update_profile(id, &fields)
            .await
            .map_err(unique_email)?
            .ok_or(UserError::NotFound)
    }
}

fn non_empty_or(value: String, current: &str) -> String {
    if value.is_empty() {
        current.to_string()
    } else {
        value
    }
}

// Гонка двух регистраций на один email ловится уникальным индексом
fn unique_email(err: sqlx::Error) -> UserError {
    if err.as_database_error().is_some_and(|e| e.is_unique_violation()) {
        UserError::EmailInUse
    } else {
        UserError::Database(err)
    }
}
