use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::date::{has_started, overlaps};
use crate::models::{DateRange, PropertyStatus, RatePatch, RateScope, SeasonalRate};
use crate::services::cache::{self, Cache};
use crate::services::owned_property;

/// Create a seasonal rate. The whole guard — scope resolution, ownership,
/// sanity checks, overlap scan — and the insert run in one transaction so two
/// concurrent writers cannot both pass the scan against stale reads.
pub fn create_rate(
    conn: &mut Connection,
    cache: &Cache,
    tenant_id: &str,
    scope: RateScope,
    name: &str,
    range: DateRange,
    fixed_price: f64,
) -> Result<SeasonalRate, AppError> {
    if fixed_price <= 0.0 {
        return Err(AppError::InvalidPrice);
    }

    let tx = conn.transaction()?;

    let property_id = resolve_scope_property(&tx, scope, tenant_id)?;

    let existing = queries::get_rates_in_scope(&tx, scope)?;
    assert_no_rate_overlap(&range, &existing, None)?;

    let id = queries::insert_rate(&tx, scope, name, &range, fixed_price)?;
    tx.commit()?;

    tracing::info!(rate_id = id, ?scope, "created seasonal rate");
    invalidate_pricing_caches(cache, property_id);

    Ok(SeasonalRate {
        id,
        scope,
        name: name.to_string(),
        start_date: range.start,
        end_date: range.end,
        fixed_price,
    })
}

/// Apply a per-field patch to a rate. A rate whose range has already started
/// (relative to today in the reporting timezone) rejects every change.
pub fn update_rate(
    conn: &mut Connection,
    cache: &Cache,
    tenant_id: &str,
    rate_id: i64,
    patch: &RatePatch,
    today: NaiveDate,
) -> Result<SeasonalRate, AppError> {
    let tx = conn.transaction()?;

    let mut rate = queries::get_rate(&tx, rate_id)?
        .ok_or_else(|| AppError::NotFound(format!("seasonal rate {rate_id}")))?;
    let property_id = resolve_scope_property(&tx, rate.scope, tenant_id)?;

    if has_started(rate.start_date, today) {
        return Err(AppError::ImmutablePastRate);
    }

    if let Some(name) = &patch.name {
        rate.name = name.clone();
    }
    if let Some(start) = patch.start_date {
        rate.start_date = start;
    }
    if let Some(end) = patch.end_date {
        rate.end_date = end;
    }
    if let Some(price) = patch.fixed_price {
        rate.fixed_price = price;
    }

    let range = DateRange::new(rate.start_date, rate.end_date)?;
    if rate.fixed_price <= 0.0 {
        return Err(AppError::InvalidPrice);
    }

    let existing = queries::get_rates_in_scope(&tx, rate.scope)?;
    assert_no_rate_overlap(&range, &existing, Some(rate_id))?;

    queries::update_rate(&tx, &rate)?;
    tx.commit()?;

    tracing::info!(rate_id, "updated seasonal rate");
    invalidate_pricing_caches(cache, property_id);

    Ok(rate)
}

pub fn delete_rate(
    conn: &mut Connection,
    cache: &Cache,
    tenant_id: &str,
    rate_id: i64,
    today: NaiveDate,
) -> Result<(), AppError> {
    let tx = conn.transaction()?;

    let rate = queries::get_rate(&tx, rate_id)?
        .ok_or_else(|| AppError::NotFound(format!("seasonal rate {rate_id}")))?;
    let property_id = resolve_scope_property(&tx, rate.scope, tenant_id)?;

    if has_started(rate.start_date, today) {
        return Err(AppError::ImmutablePastRate);
    }

    queries::soft_delete_rate(&tx, rate_id)?;
    tx.commit()?;

    tracing::info!(rate_id, "deleted seasonal rate");
    invalidate_pricing_caches(cache, property_id);

    Ok(())
}

/// Resolve a rate scope to its owning property, checking tenant ownership.
/// Room-scoped rates additionally require the parent property to be
/// published.
fn resolve_scope_property(
    conn: &Connection,
    scope: RateScope,
    tenant_id: &str,
) -> Result<i64, AppError> {
    match scope {
        RateScope::Room(room_id) => {
            let room = queries::get_room(conn, room_id)?
                .ok_or_else(|| AppError::NotFound(format!("room {room_id}")))?;
            let property = owned_property(conn, room.property_id, tenant_id)?;
            if property.status != PropertyStatus::Published {
                return Err(AppError::NotFound(format!(
                    "room {room_id} is not in a published property"
                )));
            }
            Ok(property.id)
        }
        RateScope::Property(property_id) => {
            let property = owned_property(conn, property_id, tenant_id)?;
            Ok(property.id)
        }
    }
}

fn assert_no_rate_overlap(
    range: &DateRange,
    existing: &[SeasonalRate],
    exclude_id: Option<i64>,
) -> Result<(), AppError> {
    let conflict = existing.iter().any(|rate| {
        Some(rate.id) != exclude_id
            && overlaps(rate.start_date, rate.end_date, range.start, range.end)
    });
    if conflict {
        tracing::debug!(?range, "seasonal rate overlap rejected");
        return Err(AppError::RateConflict);
    }
    Ok(())
}

fn invalidate_pricing_caches(cache: &Cache, property_id: i64) {
    cache.invalidate_prefix(cache::search_prefix());
    cache.invalidate_prefix(&cache::calendar_prefix(property_id));
}
