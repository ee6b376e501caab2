use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::AuthUser;
use crate::db::{bookings, profiles::load_snapshot};
use crate::error::AppError;
use crate::models::booking::TimeSlot;
use crate::models::profile::ProfileUpdate;
use crate::onboarding::{OnboardingSnapshot, OnboardingStep};

#[derive(Debug, Serialize)]
pub struct NextService {
    pub booking_id: i64,
    pub date: chrono::NaiveDate,
    pub time_slot: Option<TimeSlot>,
    pub time_slot_label: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub onboarding_step: OnboardingStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
    #[serde(flatten)]
    pub profile: OnboardingSnapshot,
    pub next_service: Option<NextService>,
}

pub async fn summary(pool: web::Data<SqlitePool>, user: AuthUser) -> Result<HttpResponse, AppError> {
    let snapshot = load_snapshot(&pool, user.id()).await?;
    let step = snapshot.step();

    let today = chrono::Utc::now().date_naive();
    let next_service = bookings::upcoming(&pool, user.id(), today)
        .await?
        .into_iter()
        .next()
        .and_then(|booking| {
            booking.booking_date.map(|date| NextService {
                booking_id: booking.id,
                date,
                time_slot: booking.time_slot,
                time_slot_label: booking.time_slot.map(|slot| slot.label()),
            })
        });

    Ok(HttpResponse::Ok().json(DashboardSummary {
        onboarding_step: step,
        redirect: (step != OnboardingStep::Completed).then_some("/room-details"),
        profile: snapshot,
        next_service,
    }))
}

/// Saves the edit-profile form: profile, property and preferences together.
pub async fn update_profile(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    body: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO profiles (id, name, phone) VALUES (?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET name = excluded.name, phone = excluded.phone
        "#,
    )
    .bind(user.id())
    .bind(body.name.trim())
    .bind(body.phone.trim())
    .execute(&mut *tx)
    .await?;

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
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO service_preferences (user_id, frequency) VALUES (?, ?)
        ON CONFLICT(user_id) DO UPDATE SET frequency = excluded.frequency
        "#,
    )
    .bind(user.id())
    .bind(body.frequency)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    log::info!("User {} updated their profile", user.id());
    let snapshot = load_snapshot(&pool, user.id()).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}
