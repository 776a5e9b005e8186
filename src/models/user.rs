use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Cashier,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Cashier => "cashier",
            Role::Admin => "admin",
        }
    }

    /// Cashiers and admins see and manage every customer's bookings.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Cashier | Role::Admin)
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "customer" => Ok(Role::Customer),
            "cashier" => Ok(Role::Cashier),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownVariant { kind: "role", value }),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub avatar_url: String,
}

impl User {
    // bcrypt вместо plain-паролей
    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}
