use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::date::{has_started, overlaps};
use crate::models::{BlockPatch, DateRange, MaintenanceBlock, Room};
use crate::services::cache::{self, Cache};
use crate::services::owned_room;

/// Create a maintenance block for a room. Guard and insert share one
/// transaction: ownership, `blocked_units` within the room's inventory, and
/// no overlap with any other live block for the room (one block per room per
/// day).
pub fn create_block(
    conn: &mut Connection,
    cache: &Cache,
    tenant_id: &str,
    room_id: i64,
    range: DateRange,
    blocked_units: i64,
    reason: Option<&str>,
) -> Result<MaintenanceBlock, AppError> {
    let tx = conn.transaction()?;

    let (room, property) = owned_room(&tx, room_id, tenant_id)?;
    check_blocked_units(&room, blocked_units)?;

    let existing = queries::get_blocks_for_room(&tx, room_id)?;
    assert_no_block_overlap(&range, &existing, None)?;

    let id = queries::insert_block(&tx, room_id, &range, blocked_units, reason)?;
    tx.commit()?;

    tracing::info!(block_id = id, room_id, "created maintenance block");
    invalidate_pricing_caches(cache, property.id);

    Ok(MaintenanceBlock {
        id,
        room_id,
        start_date: range.start,
        end_date: range.end,
        blocked_units,
        reason: reason.map(str::to_string),
    })
}

/// Apply a per-field patch to a block. Once the block's range has started,
/// the start date is fixed and the end date may only move later; everything
/// else about the window is history.
pub fn update_block(
    conn: &mut Connection,
    cache: &Cache,
    tenant_id: &str,
    block_id: i64,
    patch: &BlockPatch,
    today: NaiveDate,
) -> Result<MaintenanceBlock, AppError> {
    let tx = conn.transaction()?;

    let original = queries::get_block(&tx, block_id)?
        .ok_or_else(|| AppError::NotFound(format!("maintenance block {block_id}")))?;
    let (room, property) = owned_room(&tx, original.room_id, tenant_id)?;

    let mut block = original.clone();
    if let Some(start) = patch.start_date {
        block.start_date = start;
    }
    if let Some(end) = patch.end_date {
        block.end_date = end;
    }
    if let Some(units) = patch.blocked_units {
        block.blocked_units = units;
    }
    if let Some(reason) = &patch.reason {
        block.reason = Some(reason.clone());
    }

    if has_started(original.start_date, today) {
        let start_moved = block.start_date != original.start_date;
        let end_shrunk = block.end_date < original.end_date;
        if start_moved || end_shrunk {
            return Err(AppError::ImmutablePastBlock);
        }
    }

    let range = DateRange::new(block.start_date, block.end_date)?;
    check_blocked_units(&room, block.blocked_units)?;

    let existing = queries::get_blocks_for_room(&tx, block.room_id)?;
    assert_no_block_overlap(&range, &existing, Some(block_id))?;

    queries::update_block(&tx, &block)?;
    tx.commit()?;

    tracing::info!(block_id, "updated maintenance block");
    invalidate_pricing_caches(cache, property.id);

    Ok(block)
}

pub fn delete_block(
    conn: &mut Connection,
    cache: &Cache,
    tenant_id: &str,
    block_id: i64,
    today: NaiveDate,
) -> Result<(), AppError> {
    let tx = conn.transaction()?;

    let block = queries::get_block(&tx, block_id)?
        .ok_or_else(|| AppError::NotFound(format!("maintenance block {block_id}")))?;
    let (_, property) = owned_room(&tx, block.room_id, tenant_id)?;

    if has_started(block.start_date, today) {
        return Err(AppError::ImmutablePastBlock);
    }

    queries::soft_delete_block(&tx, block_id)?;
    tx.commit()?;

    tracing::info!(block_id, "deleted maintenance block");
    invalidate_pricing_caches(cache, property.id);

    Ok(())
}

fn check_blocked_units(room: &Room, blocked_units: i64) -> Result<(), AppError> {
    if blocked_units < 1 {
        return Err(AppError::CapacityExceeded(
            "blocked units must be at least 1".to_string(),
        ));
    }
    if blocked_units > room.total_units {
        return Err(AppError::CapacityExceeded(format!(
            "cannot block {blocked_units} of {} units",
            room.total_units
        )));
    }
    Ok(())
}

fn assert_no_block_overlap(
    range: &DateRange,
    existing: &[MaintenanceBlock],
    exclude_id: Option<i64>,
) -> Result<(), AppError> {
    let conflict = existing.iter().any(|block| {
        Some(block.id) != exclude_id
            && overlaps(block.start_date, block.end_date, range.start, range.end)
    });
    if conflict {
        tracing::debug!(?range, "maintenance block overlap rejected");
        return Err(AppError::BlockConflict);
    }
    Ok(())
}

fn invalidate_pricing_caches(cache: &Cache, property_id: i64) {
    cache.invalidate_prefix(cache::search_prefix());
    cache.invalidate_prefix(&cache::calendar_prefix(property_id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::PropertyStatus;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(d(start), d(end)).unwrap()
    }

    fn setup() -> (Connection, Cache, i64) {
        let conn = db::init_db(":memory:").unwrap();
        let property_id =
            queries::insert_property(&conn, "tenant-1", "Seaside Villa", PropertyStatus::Published)
                .unwrap();
        let room_id = queries::insert_room(&conn, property_id, "Garden Room", 100.0, 3, 2).unwrap();
        (conn, Cache::new(), room_id)
    }

    const TODAY: &str = "2025-01-01";

    #[test]
    fn test_create_block() {
        let (mut conn, cache, room_id) = setup();
        let block = create_block(
            &mut conn,
            &cache,
            "tenant-1",
            room_id,
            range("2025-06-10", "2025-06-15"),
            2,
            Some("repainting"),
        )
        .unwrap();
        assert_eq!(block.room_id, room_id);
        assert_eq!(block.blocked_units, 2);
    }

    #[test]
    fn test_blocked_units_capped_by_room_inventory() {
        let (mut conn, cache, room_id) = setup();
        let result = create_block(
            &mut conn,
            &cache,
            "tenant-1",
            room_id,
            range("2025-06-10", "2025-06-15"),
            4,
            None,
        );
        assert!(matches!(result, Err(AppError::CapacityExceeded(_))));

        let result = create_block(
            &mut conn,
            &cache,
            "tenant-1",
            room_id,
            range("2025-06-10", "2025-06-15"),
            0,
            None,
        );
        assert!(matches!(result, Err(AppError::CapacityExceeded(_))));
    }

    #[test]
    fn test_overlapping_blocks_conflict() {
        let (mut conn, cache, room_id) = setup();
        create_block(
            &mut conn,
            &cache,
            "tenant-1",
            room_id,
            range("2025-06-10", "2025-06-15"),
            1,
            None,
        )
        .unwrap();

        let result = create_block(
            &mut conn,
            &cache,
            "tenant-1",
            room_id,
            range("2025-06-14", "2025-06-20"),
            1,
            None,
        );
        assert!(matches!(result, Err(AppError::BlockConflict)));

        // A back-to-back block starting on the end date is allowed.
        assert!(create_block(
            &mut conn,
            &cache,
            "tenant-1",
            room_id,
            range("2025-06-15", "2025-06-20"),
            1,
            None,
        )
        .is_ok());
    }

    #[test]
    fn test_wrong_tenant_is_not_found() {
        let (mut conn, cache, room_id) = setup();
        let result = create_block(
            &mut conn,
            &cache,
            "someone-else",
            room_id,
            range("2025-06-10", "2025-06-15"),
            1,
            None,
        );
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_update_respects_overlap_and_range() {
        let (mut conn, cache, room_id) = setup();
        create_block(
            &mut conn,
            &cache,
            "tenant-1",
            room_id,
            range("2025-06-01", "2025-06-05"),
            1,
            None,
        )
        .unwrap();
        let second = create_block(
            &mut conn,
            &cache,
            "tenant-1",
            room_id,
            range("2025-06-10", "2025-06-15"),
            1,
            None,
        )
        .unwrap();

        // Moving the second block over the first conflicts.
        let patch = BlockPatch {
            start_date: Some(d("2025-06-04")),
            ..Default::default()
        };
        let result = update_block(&mut conn, &cache, "tenant-1", second.id, &patch, d(TODAY));
        assert!(matches!(result, Err(AppError::BlockConflict)));

        // A clean move is fine.
        let patch = BlockPatch {
            start_date: Some(d("2025-06-06")),
            ..Default::default()
        };
        let updated = update_block(&mut conn, &cache, "tenant-1", second.id, &patch, d(TODAY)).unwrap();
        assert_eq!(updated.start_date, d("2025-06-06"));

        // Inverted range is rejected.
        let patch = BlockPatch {
            end_date: Some(d("2025-06-01")),
            ..Default::default()
        };
        let result = update_block(&mut conn, &cache, "tenant-1", second.id, &patch, d(TODAY));
        assert!(matches!(result, Err(AppError::InvalidRange)));
    }

    #[test]
    fn test_started_block_allows_only_end_extension() {
        let (mut conn, cache, room_id) = setup();
        let block = create_block(
            &mut conn,
            &cache,
            "tenant-1",
            room_id,
            range("2025-06-10", "2025-06-15"),
            1,
            None,
        )
        .unwrap();
        let today = d("2025-06-12");

        // Extending the end is allowed while the block is running.
        let patch = BlockPatch {
            end_date: Some(d("2025-06-18")),
            ..Default::default()
        };
        let updated = update_block(&mut conn, &cache, "tenant-1", block.id, &patch, today).unwrap();
        assert_eq!(updated.end_date, d("2025-06-18"));

        // Shrinking the end is not.
        let patch = BlockPatch {
            end_date: Some(d("2025-06-13")),
            ..Default::default()
        };
        let result = update_block(&mut conn, &cache, "tenant-1", block.id, &patch, today);
        assert!(matches!(result, Err(AppError::ImmutablePastBlock)));

        // Neither is moving the start.
        let patch = BlockPatch {
            start_date: Some(d("2025-06-11")),
            ..Default::default()
        };
        let result = update_block(&mut conn, &cache, "tenant-1", block.id, &patch, today);
        assert!(matches!(result, Err(AppError::ImmutablePastBlock)));

        // And deletion fails outright.
        let result = delete_block(&mut conn, &cache, "tenant-1", block.id, today);
        assert!(matches!(result, Err(AppError::ImmutablePastBlock)));
    }

    #[test]
    fn test_future_block_can_be_deleted() {
        let (mut conn, cache, room_id) = setup();
        let block = create_block(
            &mut conn,
            &cache,
            "tenant-1",
            room_id,
            range("2025-06-10", "2025-06-15"),
            1,
            None,
        )
        .unwrap();

        delete_block(&mut conn, &cache, "tenant-1", block.id, d("2025-06-09")).unwrap();
        assert!(queries::get_block(&conn, block.id).unwrap().is_none());
    }
}
