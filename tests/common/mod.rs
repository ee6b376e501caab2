#![allow(dead_code)]

use std::time::Duration;

use actix_web::{http::header, web};
use sqlx::SqlitePool;

use sparkle_clean::auth::AuthContext;
use sparkle_clean::db;
use sparkle_clean::models::account::{Credentials, Session};
use sparkle_clean::retry::RetryPolicy;

/// Builds the full application around an in-memory database.
#[macro_export]
macro_rules! test_app {
    ($pool:expr, $auth:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($pool.clone()))
                .app_data($auth.clone())
                .configure(sparkle_clean::routes::configure),
        )
        .await
    };
}

pub async fn setup() -> (SqlitePool, web::Data<AuthContext>) {
    setup_with_ttl(chrono::Duration::hours(1)).await
}

pub async fn setup_with_ttl(ttl: chrono::Duration) -> (SqlitePool, web::Data<AuthContext>) {
    let pool = db::memory_pool().await.expect("in-memory database");
    let auth = web::Data::new(AuthContext::with_settings(
        pool.clone(),
        ttl,
        RetryPolicy::new(3, Duration::from_millis(1)),
    ));
    (pool, auth)
}

pub async fn register(auth: &AuthContext, email: &str) -> Session {
    auth.sign_up(&Credentials {
        email: email.to_string(),
        password: "password123".to_string(),
    })
    .await
    .expect("sign up")
}

/// Fills in all three onboarding records directly.
pub async fn onboard(pool: &SqlitePool, user_id: i64) {
    sqlx::query("UPDATE profiles SET name = 'Jamie Doe', phone = '555-555-5555' WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO properties (user_id, property_type, address) VALUES (?, 'house', '123 Main St, Springfield, IL 62701')")
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO service_preferences (user_id, frequency) VALUES (?, 'weekly')")
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}

pub fn bearer(session: &Session) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", session.token))
}

pub fn days_from_today(days: i64) -> chrono::NaiveDate {
    chrono::Utc::now().date_naive() + chrono::Duration::days(days)
}

pub async fn count(pool: &SqlitePool, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
}
