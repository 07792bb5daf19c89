use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub tenant_id: String,
    pub name: String,
    pub status: PropertyStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Draft,
    Published,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Draft => "draft",
            PropertyStatus::Published => "published",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "published" => PropertyStatus::Published,
            _ => PropertyStatus::Draft,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub property_id: i64,
    pub name: String,
    /// Fallback nightly rate when no seasonal rate covers the date.
    pub base_price: f64,
    pub total_units: i64,
    pub total_guests: i64,
}
