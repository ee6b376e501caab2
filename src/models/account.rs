use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub expires_at: chrono::NaiveDateTime,
}

/// The signed-in user a request is acting for.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SessionUser {
    pub user_id: i64,
    pub email: String,
    #[serde(skip)]
    pub token: String,
    pub expires_at: chrono::NaiveDateTime,
}
