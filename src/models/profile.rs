use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Apartment,
}

impl PropertyType {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TimePreference {
    Morning,
    Afternoon,
    Evening,
}

impl TimePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            TimePreference::Morning => "morning",
            TimePreference::Afternoon => "afternoon",
            TimePreference::Evening => "evening",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Property {
    pub id: i64,
    pub user_id: i64,
    pub property_type: PropertyType,
    pub address: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ServicePreference {
    pub id: i64,
    pub user_id: i64,
    pub frequency: Frequency,
    pub time_preference: Option<TimePreference>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BasicInfo {
    #[validate(custom(function = "valid_name"))]
    pub name: String,
    #[validate(custom(function = "valid_phone"))]
    pub phone: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PropertyDetails {
    pub property_type: PropertyType,
    #[validate(custom(function = "valid_address"))]
    pub address: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PreferencesInput {
    pub frequency: Frequency,
    pub time_preference: Option<TimePreference>,
}

/// Everything the edit-profile form saves at once.
#[derive(Debug, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(custom(function = "valid_name"))]
    pub name: String,
    #[validate(custom(function = "valid_phone"))]
    pub phone: String,
    pub property_type: PropertyType,
    #[validate(custom(function = "valid_address"))]
    pub address: String,
    pub frequency: Frequency,
}

// Values are stored trimmed, so bounds apply to the trimmed text.
fn trimmed_length(value: &str, min: usize, max: usize, code: &'static str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::new(code))
    }
}

fn valid_name(name: &str) -> Result<(), ValidationError> {
    trimmed_length(name, 1, 120, "name")
}

fn valid_phone(phone: &str) -> Result<(), ValidationError> {
    trimmed_length(phone, 7, 32, "phone")
}

fn valid_address(address: &str) -> Result<(), ValidationError> {
    trimmed_length(address, 5, 300, "address")
}
