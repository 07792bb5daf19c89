use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// What a seasonal rate applies to: one room, or every room of one property
/// that lacks a room-level rate for the date. The tagged variant makes the
/// room-xor-property invariant impossible to violate once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "lowercase")]
pub enum RateScope {
    Room(i64),
    Property(i64),
}

impl RateScope {
    /// Fold the wire format's two optional ids into a scope, rejecting both
    /// and neither.
    pub fn from_ids(room_id: Option<i64>, property_id: Option<i64>) -> Result<Self, AppError> {
        match (room_id, property_id) {
            (Some(_), Some(_)) => Err(AppError::ScopeAmbiguous),
            (Some(room), None) => Ok(RateScope::Room(room)),
            (None, Some(property)) => Ok(RateScope::Property(property)),
            (None, None) => Err(AppError::ScopeMissing),
        }
    }

    pub fn room_id(&self) -> Option<i64> {
        match self {
            RateScope::Room(id) => Some(*id),
            RateScope::Property(_) => None,
        }
    }

    pub fn property_id(&self) -> Option<i64> {
        match self {
            RateScope::Room(_) => None,
            RateScope::Property(id) => Some(*id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalRate {
    pub id: i64,
    pub scope: RateScope,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fixed_price: f64,
}

impl SeasonalRate {
    /// Whether this rate covers `date`, half-open on the end date.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date < self.end_date
    }
}

/// Per-field update for a seasonal rate. Absent fields are left untouched;
/// there is no untyped merge step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatePatch {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub fixed_price: Option<f64>,
}

impl RatePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.fixed_price.is_none()
    }
}
