use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::AuthUser;
use crate::db::profiles::load_snapshot;
use crate::error::AppError;
use crate::models::profile::{BasicInfo, PreferencesInput, PropertyDetails};
use crate::onboarding::{OnboardingStatus, OnboardingStep};

async fn status_response(pool: &SqlitePool, user_id: i64) -> Result<HttpResponse, AppError> {
    let snapshot = load_snapshot(pool, user_id).await?;
    Ok(HttpResponse::Ok().json(OnboardingStatus::from(snapshot)))
}

async fn require_step(pool: &SqlitePool, user_id: i64, step: OnboardingStep) -> Result<(), AppError> {
    let current = load_snapshot(pool, user_id).await?.step();
    if current.allows(step) {
        Ok(())
    } else {
        Err(AppError::Conflict(format!(
            "Onboarding is at step {}, cannot submit {}",
            current.as_str(),
            step.as_str()
        )))
    }
}

pub async fn status(pool: web::Data<SqlitePool>, user: AuthUser) -> Result<HttpResponse, AppError> {
    status_response(&pool, user.id()).await
}

pub async fn basic_info(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    body: web::Json<BasicInfo>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    sqlx::query(
        r#"
        INSERT INTO profiles (id, name, phone) VALUES (?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET name = excluded.name, phone = excluded.phone
        "#,
    )
    .bind(user.id())
    .bind(body.name.trim())
    .bind(body.phone.trim())
    .execute(pool.get_ref())
    .await?;

    status_response(&pool, user.id()).await
}

pub async fn property_details(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    body: web::Json<PropertyDetails>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;
    require_step(&pool, user.id(), OnboardingStep::PropertyDetails).await?;

    sqlx::query(
        r#"
        INSERT INTO properties (user_id, property_type, address) VALUES (?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            property_type = excluded.property_type,
            address = excluded.address
        "#,
    )
    .bind(user.id())
    .bind(body.property_type)
    .bind(body.address.trim())
    .execute(pool.get_ref())
    .await?;

    status_response(&pool, user.id()).await
}

pub async fn service_preferences(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    body: web::Json<PreferencesInput>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;
    require_step(&pool, user.id(), OnboardingStep::ServicePreferences).await?;

    sqlx::query(
        r#"
        INSERT INTO service_preferences (user_id, frequency, time_preference) VALUES (?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            frequency = excluded.frequency,
            time_preference = excluded.time_preference
        "#,
    )
    .bind(user.id())
    .bind(body.frequency)
    .bind(body.time_preference)
    .execute(pool.get_ref())
    .await?;

    log::info!("User {} completed onboarding", user.id());
    status_response(&pool, user.id()).await
}
