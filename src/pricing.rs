//! Room selection and booking totals.
//!
//! Prices are flat: a standard clean is $50 per room, a deep clean $100,
//! and every add-on is $10. Countable rooms multiply the whole line
//! (tier plus add-ons) by their quantity.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const STANDARD_PRICE: f64 = 50.0;
pub const DEEP_PRICE: f64 = 100.0;
pub const ADDON_PRICE: f64 = 10.0;

/// Room types that may be booked more than once.
pub const COUNTABLE_ROOMS: [&str; 5] = ["Bathroom", "Half Bath", "Bedroom", "Media Room", "Home Office"];

pub fn is_countable(room_type: &str) -> bool {
    COUNTABLE_ROOMS.contains(&room_type)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ServiceTier {
    #[default]
    Standard,
    Deep,
}

impl ServiceTier {
    pub fn unit_price(self) -> f64 {
        match self {
            ServiceTier::Standard => STANDARD_PRICE,
            ServiceTier::Deep => DEEP_PRICE,
        }
    }
}

fn new_room_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedRoom {
    #[serde(default = "new_room_id")]
    pub id: String,
    pub room_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub tier: ServiceTier,
    #[serde(default)]
    pub addons: Vec<String>,
}

impl SelectedRoom {
    pub fn new(room_type: &str) -> Self {
        Self {
            id: new_room_id(),
            room_type: room_type.to_string(),
            quantity: is_countable(room_type).then_some(1),
            tier: ServiceTier::Standard,
            addons: Vec::new(),
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }

    pub fn line_total(&self) -> f64 {
        let per_unit = self.tier.unit_price() + self.addons.len() as f64 * ADDON_PRICE;
        per_unit * self.quantity() as f64
    }
}

pub fn calculate_total(rooms: &[SelectedRoom]) -> f64 {
    rooms.iter().map(SelectedRoom::line_total).sum()
}

/// A customer's in-progress room picks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub rooms: Vec<SelectedRoom>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, room_type: &str) -> Option<&SelectedRoom> {
        self.rooms.iter().find(|room| room.room_type == room_type)
    }

    /// Countable rooms are added once and then adjusted by quantity;
    /// everything else toggles on and off.
    pub fn toggle_room(&mut self, room_type: &str) {
        let present = self.find(room_type).is_some();

        if is_countable(room_type) {
            if !present {
                self.rooms.push(SelectedRoom::new(room_type));
            }
        } else if present {
            self.rooms.retain(|room| room.room_type != room_type);
        } else {
            self.rooms.push(SelectedRoom::new(room_type));
        }
    }

    pub fn remove_room(&mut self, room_id: &str) {
        self.rooms.retain(|room| room.id != room_id);
    }

    pub fn change_quantity(&mut self, room_id: &str, delta: i64) {
        if let Some(room) = self.room_mut(room_id) {
            let next = i64::from(room.quantity())
                .checked_add(delta)
                .and_then(|next| u32::try_from(next).ok());
            if let Some(next) = next.filter(|&next| next >= 1) {
                room.quantity = Some(next);
            }
        }
    }

    pub fn set_tier(&mut self, room_id: &str, tier: ServiceTier) {
        if let Some(room) = self.room_mut(room_id) {
            room.tier = tier;
        }
    }

    pub fn toggle_addon(&mut self, room_id: &str, addon: &str) {
        if let Some(room) = self.room_mut(room_id) {
            if let Some(pos) = room.addons.iter().position(|a| a == addon) {
                room.addons.remove(pos);
            } else {
                room.addons.push(addon.to_string());
            }
        }
    }

    pub fn total(&self) -> f64 {
        calculate_total(&self.rooms)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate_rooms(&self.rooms)
    }

    fn room_mut(&mut self, room_id: &str) -> Option<&mut SelectedRoom> {
        self.rooms.iter_mut().find(|room| room.id == room_id)
    }
}

impl From<Vec<SelectedRoom>> for Selection {
    fn from(rooms: Vec<SelectedRoom>) -> Self {
        Self { rooms }
    }
}

pub fn validate_rooms(rooms: &[SelectedRoom]) -> Result<(), AppError> {
    if rooms.is_empty() {
        return Err(AppError::Validation(
            "Select at least one room to book".to_string(),
        ));
    }

    for room in rooms {
        let countable = is_countable(&room.room_type);
        match room.quantity {
            Some(0) if countable => {
                return Err(AppError::Validation(format!(
                    "{} quantity must be at least 1",
                    room.room_type
                )))
            }
            Some(q) if !countable && q != 1 => {
                return Err(AppError::Validation(format!(
                    "{} cannot be booked more than once",
                    room.room_type
                )))
            }
            _ => {}
        }

        let mut addons = room.addons.clone();
        addons.sort();
        addons.dedup();
        if addons.len() != room.addons.len() {
            return Err(AppError::Validation(format!(
                "Duplicate add-on selected for {}",
                room.room_type
            )));
        }
    }

    let mut room_types: Vec<&str> = rooms
        .iter()
        .map(|room| room.room_type.as_str())
        .collect();
    room_types.sort_unstable();
    let before = room_types.len();
    room_types.dedup();
    if room_types.len() != before {
        return Err(AppError::Validation(
            "Each room type may only be selected once".to_string(),
        ));
    }

    Ok(())
}
