use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::pricing::{SelectedRoom, ServiceTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_editable(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Midday,
    Afternoon,
}

impl TimeSlot {
    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::Morning => "9:00 AM - 11:00 AM",
            TimeSlot::Midday => "12:00 PM - 2:00 PM",
            TimeSlot::Afternoon => "3:00 PM - 5:00 PM",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ServiceBooking {
    pub id: i64,
    pub user_id: i64,
    pub booking_date: Option<chrono::NaiveDate>,
    pub time_slot: Option<TimeSlot>,
    pub status: BookingStatus,
    pub total_price: f64,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingRoom {
    pub id: i64,
    pub room_type: String,
    pub service_type: ServiceTier,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomDetail {
    #[serde(flatten)]
    pub room: BookingRoom,
    pub addons: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: ServiceBooking,
    pub time_slot_label: Option<&'static str>,
    pub rooms: Vec<RoomDetail>,
}

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub booking_date: chrono::NaiveDate,
    pub time_slot: TimeSlot,
    pub rooms: Vec<SelectedRoom>,
}
