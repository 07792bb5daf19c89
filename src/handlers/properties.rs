use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::json_response;
use crate::models::date::{parse_date, today};
use crate::models::DateRange;
use crate::services::availability::is_available;
use crate::services::calendar::{calendar_30, CALENDAR_DAYS};
use crate::services::pricing::resolve_rate;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DetailQuery {
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub guests: Option<i64>,
}

#[derive(Serialize)]
pub struct RoomDetail {
    pub room_id: i64,
    pub name: String,
    pub base_price: f64,
    pub total_units: i64,
    pub total_guests: i64,
    /// Present only when the query carried a date range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_override: Option<bool>,
}

#[derive(Serialize)]
pub struct PropertyDetailResponse {
    pub property_id: i64,
    pub name: String,
    pub rooms: Vec<RoomDetail>,
}

// GET /api/properties/:id
pub async fn property_detail(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<i64>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<PropertyDetailResponse>, AppError> {
    let range = match (&query.check_in, &query.check_out) {
        (Some(check_in), Some(check_out)) => Some(DateRange::parse(check_in, check_out)?),
        _ => None,
    };
    let guests = query.guests.unwrap_or(1);

    let db = state.db.lock().unwrap();
    let property = queries::get_property(&db, property_id)?
        .ok_or_else(|| AppError::NotFound(format!("property {property_id}")))?;

    let rooms = match range {
        Some(range) => {
            let inventory = queries::load_property_inventory(&db, &property, &range)?;
            inventory
                .rooms
                .iter()
                .map(|ri| {
                    let available =
                        is_available(&ri.room, &range, guests, &ri.bookings, &ri.blocks);
                    let resolved = resolve_rate(
                        range.start,
                        &ri.rates,
                        &inventory.property_rates,
                        ri.room.base_price,
                    );
                    RoomDetail {
                        room_id: ri.room.id,
                        name: ri.room.name.clone(),
                        base_price: ri.room.base_price,
                        total_units: ri.room.total_units,
                        total_guests: ri.room.total_guests,
                        available: Some(available),
                        price: Some(resolved.price),
                        is_override: Some(resolved.is_override),
                    }
                })
                .collect()
        }
        None => queries::get_rooms_for_property(&db, property_id)?
            .into_iter()
            .map(|room| RoomDetail {
                room_id: room.id,
                name: room.name,
                base_price: room.base_price,
                total_units: room.total_units,
                total_guests: room.total_guests,
                available: None,
                price: None,
                is_override: None,
            })
            .collect(),
    };

    Ok(Json(PropertyDetailResponse {
        property_id: property.id,
        name: property.name,
        rooms,
    }))
}

#[derive(Deserialize)]
pub struct CalendarQuery {
    pub start_date: Option<String>,
}

// GET /api/properties/:id/calendar
pub async fn property_calendar(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<i64>,
    Query(query): Query<CalendarQuery>,
) -> Result<Response, AppError> {
    let start = match &query.start_date {
        Some(raw) => parse_date(raw)?,
        None => today(),
    };

    let cache_key = format!("calendar:{property_id}:{start}");
    if let Some(hit) = state.cache.get(&cache_key) {
        return Ok(json_response(hit));
    }

    let days = {
        let db = state.db.lock().unwrap();
        let property = queries::get_property(&db, property_id)?
            .ok_or_else(|| AppError::NotFound(format!("property {property_id}")))?;
        let window = DateRange::new(start, start + Duration::days(CALENDAR_DAYS))?;
        let inventory = queries::load_property_inventory(&db, &property, &window)?;
        calendar_30(&inventory, start)
    };

    let body = serde_json::to_string(&days).map_err(anyhow::Error::from)?;
    state.cache.put(&cache_key, body.clone());
    Ok(json_response(body))
}
