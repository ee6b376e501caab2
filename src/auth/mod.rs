//! Accounts, sessions and the admin gate.
//!
//! [`AuthContext`] is built once at startup and shared with every worker
//! as app data. Request handlers reach it through the [`AuthUser`] and
//! [`AdminUser`] extractors rather than any global state.

use actix_web::web;
use log::{info, warn};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;
use crate::error::AppError;
use crate::models::account::{Credentials, Session, SessionUser, User};
use crate::models::admin::{AdminProfile, AdminRole};
use crate::retry::{with_backoff, RetryPolicy};

mod extract;
pub mod password;

pub use extract::{AdminUser, AuthUser};

pub struct AuthContext {
    pool: SqlitePool,
    session_ttl: chrono::Duration,
    retry: RetryPolicy,
}

impl AuthContext {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self::with_settings(
            pool,
            chrono::Duration::hours(config.session_ttl_hours),
            config.retry_policy(),
        )
    }

    pub fn with_settings(pool: SqlitePool, session_ttl: chrono::Duration, retry: RetryPolicy) -> Self {
        Self {
            pool,
            session_ttl,
            retry,
        }
    }

    pub async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AppError> {
        let email = normalize_email(&credentials.email);
        let password = credentials.password.clone();
        let password_hash = web::block(move || password::hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

        let mut tx = self.pool.begin().await?;

        let user_id: i64 = sqlx::query_scalar(
            "INSERT INTO users (email, password_hash) VALUES (?, ?) RETURNING id",
        )
        .bind(&email)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation());
            if duplicate {
                AppError::Conflict("Email is already registered".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        sqlx::query("INSERT INTO profiles (id) VALUES (?)")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Registered user {user_id}");
        self.create_session(user_id).await
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AppError> {
        let email = normalize_email(&credentials.email);

        let user = with_backoff(&self.retry, || {
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
                .bind(email.clone())
                .fetch_optional(&self.pool)
        })
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let password = credentials.password.clone();
        let hash = user.password_hash.clone();
        let valid = web::block(move || password::verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

        if !valid {
            warn!("Failed sign in for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        self.create_session(user.id).await
    }

    pub async fn sign_out(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Resolves a bearer token. Expired sessions are removed and treated as absent.
    pub async fn session_user(&self, token: &str) -> Result<Option<SessionUser>, AppError> {
        let found = with_backoff(&self.retry, || {
            sqlx::query_as::<_, SessionUser>(
                r#"
                SELECT s.user_id, u.email, s.token, s.expires_at
                FROM sessions s
                JOIN users u ON u.id = s.user_id
                WHERE s.token = ?
                "#,
            )
            .bind(token)
            .fetch_optional(&self.pool)
        })
        .await?;

        match found {
            Some(user) if user.expires_at <= chrono::Utc::now().naive_utc() => {
                self.sign_out(token).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub async fn admin_profile(&self, user_id: i64) -> Result<Option<AdminProfile>, AppError> {
        let profile = with_backoff(&self.retry, || {
            sqlx::query_as::<_, AdminProfile>("SELECT * FROM admin_profiles WHERE id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
        })
        .await?;
        Ok(profile)
    }

    /// Creates or updates the admin profile of an existing user.
    pub async fn grant_admin(
        &self,
        user_id: i64,
        role: AdminRole,
        is_active: bool,
    ) -> Result<AdminProfile, AppError> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound("User"));
        }

        let profile = sqlx::query_as::<_, AdminProfile>(
            r#"
            INSERT INTO admin_profiles (id, role, is_active) VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                role = excluded.role,
                is_active = excluded.is_active,
                updated_at = CURRENT_TIMESTAMP
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(role)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await?;

        info!("Admin profile for user {user_id} set to {role:?} (active: {is_active})");
        Ok(profile)
    }

    /// Promotes the account with `email` to an active super admin, if it exists.
    pub async fn bootstrap_admin(&self, email: &str) -> Result<(), AppError> {
        let user_id: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;

        match user_id {
            Some(id) => {
                self.grant_admin(id, AdminRole::SuperAdmin, true).await?;
            }
            None => warn!("Bootstrap admin {email} has no account yet, skipping"),
        }
        Ok(())
    }

    /// Deletes a user and every row that belongs to them in one transaction.
    pub async fn delete_account(&self, user_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let booking_ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM service_bookings WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(&mut *tx)
                .await?;

        for booking_id in &booking_ids {
            db::bookings::delete_booking(&mut *tx, *booking_id).await?;
        }

        for statement in [
            "DELETE FROM service_preferences WHERE user_id = ?",
            "DELETE FROM properties WHERE user_id = ?",
            "DELETE FROM profiles WHERE id = ?",
            "UPDATE price_adjustments SET adjusted_by = NULL WHERE adjusted_by = ?",
            "DELETE FROM admin_profiles WHERE id = ?",
            "DELETE FROM sessions WHERE user_id = ?",
            "DELETE FROM users WHERE id = ?",
        ] {
            sqlx::query(statement).bind(user_id).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        info!(
            "Deleted account {user_id} with {} booking(s)",
            booking_ids.len()
        );
        Ok(())
    }

    pub async fn purge_expired_sessions(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(chrono::Utc::now().naive_utc())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn create_session(&self, user_id: i64) -> Result<Session, AppError> {
        let token = uuid::Uuid::new_v4().to_string();
        let expires_at = chrono::Utc::now().naive_utc() + self.session_ttl;

        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        Ok(Session {
            token,
            user_id,
            expires_at,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
