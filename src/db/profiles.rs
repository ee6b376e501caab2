use sqlx::SqlitePool;

use crate::models::profile::{Profile, Property, ServicePreference};
use crate::onboarding::OnboardingSnapshot;

/// Reads the three onboarding records for a user. Missing rows are `None`.
pub async fn load_snapshot(pool: &SqlitePool, user_id: i64) -> Result<OnboardingSnapshot, sqlx::Error> {
    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    let preference =
        sqlx::query_as::<_, ServicePreference>("SELECT * FROM service_preferences WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let (name, phone) = profile.map(|p| (p.name, p.phone)).unwrap_or_default();

    Ok(OnboardingSnapshot {
        name,
        phone,
        property_type: property.as_ref().map(|p| p.property_type.as_str().to_string()),
        address: property.map(|p| p.address),
        frequency: preference.as_ref().map(|p| p.frequency.as_str().to_string()),
        time_preference: preference
            .and_then(|p| p.time_preference)
            .map(|t| t.as_str().to_string()),
    })
}
