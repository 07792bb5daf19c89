pub mod availability;
pub mod cache;
pub mod calendar;
pub mod maintenance;
pub mod pricing;
pub mod rates;
pub mod search;

use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Property, Room};

/// Load a property, hiding rows that belong to another tenant behind the
/// same `NotFound` as rows that do not exist.
pub(crate) fn owned_property(
    conn: &Connection,
    property_id: i64,
    tenant_id: &str,
) -> Result<Property, AppError> {
    let property = queries::get_property(conn, property_id)?
        .ok_or_else(|| AppError::NotFound(format!("property {property_id}")))?;
    if property.tenant_id != tenant_id {
        return Err(AppError::NotFound(format!("property {property_id}")));
    }
    Ok(property)
}

pub(crate) fn owned_room(
    conn: &Connection,
    room_id: i64,
    tenant_id: &str,
) -> Result<(Room, Property), AppError> {
    let room = queries::get_room(conn, room_id)?
        .ok_or_else(|| AppError::NotFound(format!("room {room_id}")))?;
    let property = owned_property(conn, room.property_id, tenant_id)?;
    Ok((room, property))
}
