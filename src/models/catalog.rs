use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoomType {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RoomTypeView {
    pub id: i64,
    pub name: String,
    pub countable: bool,
}

impl From<RoomType> for RoomTypeView {
    fn from(room_type: RoomType) -> Self {
        Self {
            countable: crate::pricing::is_countable(&room_type.name),
            id: room_type.id,
            name: room_type.name,
        }
    }
}

/// A service option joined with the name of its room type, if any.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ServiceOption {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub is_addon: bool,
    pub room_type_id: Option<i64>,
    pub room_type_name: Option<String>,
}
