use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A blackout window removing a room from inventory for `[start_date, end_date)`.
///
/// `blocked_units` records how much of the room's inventory the block was
/// filed against, but availability treats any overlapping block as removing
/// the whole room (see `services::availability`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceBlock {
    pub id: i64,
    pub room_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub blocked_units: i64,
    pub reason: Option<String>,
}

/// Per-field update for a maintenance block. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockPatch {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub blocked_units: Option<i64>,
    pub reason: Option<String>,
}

impl BlockPatch {
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.blocked_units.is_none()
            && self.reason.is_none()
    }
}
