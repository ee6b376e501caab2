use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    Admin,
    Manager,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminProfile {
    pub id: i64,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct AdminGrant {
    pub role: AdminRole,
    pub is_active: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AdminStats {
    pub users_count: i64,
    pub bookings_count: i64,
    pub total_revenue: f64,
    pub completed_count: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct RevenuePoint {
    pub date: chrono::NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PriceUpdate {
    #[validate(range(min = 0.0))]
    pub new_price: f64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct PriceAdjustment {
    pub id: i64,
    pub service_option_id: i64,
    pub previous_price: f64,
    pub new_price: f64,
    pub adjusted_by: Option<i64>,
    pub created_at: chrono::NaiveDateTime,
}
