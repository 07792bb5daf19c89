use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::models::{
    Booking, BookingStatus, DateRange, MaintenanceBlock, Property, PropertyInventory,
    PropertyStatus, RateScope, Room, RoomInventory, SeasonalRate,
};

const DATE_FMT: &str = "%Y-%m-%d";

fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

fn parse_stored_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map_err(|e| anyhow::anyhow!("malformed date {s:?} in database: {e}"))
}

// ── Properties & Rooms ──

fn parse_property_row(row: &rusqlite::Row) -> anyhow::Result<Property> {
    let status_str: String = row.get(3)?;
    Ok(Property {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        name: row.get(2)?,
        status: PropertyStatus::parse(&status_str),
    })
}

pub fn get_property(conn: &Connection, id: i64) -> anyhow::Result<Option<Property>> {
    let result = conn.query_row(
        "SELECT id, tenant_id, name, status FROM properties WHERE id = ?1 AND deleted_at IS NULL",
        params![id],
        |row| Ok(parse_property_row(row)),
    );

    match result {
        Ok(property) => Ok(Some(property?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_published_properties(conn: &Connection) -> anyhow::Result<Vec<Property>> {
    let mut stmt = conn.prepare(
        "SELECT id, tenant_id, name, status FROM properties
         WHERE status = 'published' AND deleted_at IS NULL ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| Ok(parse_property_row(row)))?;

    let mut properties = vec![];
    for row in rows {
        properties.push(row??);
    }
    Ok(properties)
}

pub fn insert_property(
    conn: &Connection,
    tenant_id: &str,
    name: &str,
    status: PropertyStatus,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO properties (tenant_id, name, status) VALUES (?1, ?2, ?3)",
        params![tenant_id, name, status.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

fn parse_room_row(row: &rusqlite::Row) -> anyhow::Result<Room> {
    Ok(Room {
        id: row.get(0)?,
        property_id: row.get(1)?,
        name: row.get(2)?,
        base_price: row.get(3)?,
        total_units: row.get(4)?,
        total_guests: row.get(5)?,
    })
}

pub fn get_room(conn: &Connection, id: i64) -> anyhow::Result<Option<Room>> {
    let result = conn.query_row(
        "SELECT id, property_id, name, base_price, total_units, total_guests
         FROM rooms WHERE id = ?1 AND deleted_at IS NULL",
        params![id],
        |row| Ok(parse_room_row(row)),
    );

    match result {
        Ok(room) => Ok(Some(room?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_rooms_for_property(conn: &Connection, property_id: i64) -> anyhow::Result<Vec<Room>> {
    let mut stmt = conn.prepare(
        "SELECT id, property_id, name, base_price, total_units, total_guests
         FROM rooms WHERE property_id = ?1 AND deleted_at IS NULL ORDER BY id ASC",
    )?;

    let rows = stmt.query_map(params![property_id], |row| Ok(parse_room_row(row)))?;

    let mut rooms = vec![];
    for row in rows {
        rooms.push(row??);
    }
    Ok(rooms)
}

pub fn insert_room(
    conn: &Connection,
    property_id: i64,
    name: &str,
    base_price: f64,
    total_units: i64,
    total_guests: i64,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO rooms (property_id, name, base_price, total_units, total_guests)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![property_id, name, base_price, total_units, total_guests],
    )?;
    Ok(conn.last_insert_rowid())
}

// ── Bookings ──

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let status_str: String = row.get(2)?;
    let check_in_str: String = row.get(3)?;
    let check_out_str: String = row.get(4)?;

    Ok(Booking {
        id: row.get(0)?,
        room_id: row.get(1)?,
        status: BookingStatus::parse(&status_str),
        check_in: parse_stored_date(&check_in_str)?,
        check_out: parse_stored_date(&check_out_str)?,
    })
}

/// Non-deleted bookings for a room intersecting `[start, end)`, any status.
/// The availability resolver decides which statuses hold inventory.
pub fn get_bookings_for_room_in_range(
    conn: &Connection,
    room_id: i64,
    range: &DateRange,
) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(
        "SELECT id, room_id, status, check_in, check_out
         FROM bookings
         WHERE room_id = ?1 AND deleted_at IS NULL
           AND check_in < ?2 AND check_out > ?3
         ORDER BY check_in ASC",
    )?;

    let rows = stmt.query_map(
        params![room_id, fmt_date(range.end), fmt_date(range.start)],
        |row| Ok(parse_booking_row(row)),
    )?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, room_id, status, check_in, check_out)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            booking.id,
            booking.room_id,
            booking.status.as_str(),
            fmt_date(booking.check_in),
            fmt_date(booking.check_out),
        ],
    )?;
    Ok(())
}

// ── Maintenance blocks ──

fn parse_block_row(row: &rusqlite::Row) -> anyhow::Result<MaintenanceBlock> {
    let start_str: String = row.get(2)?;
    let end_str: String = row.get(3)?;

    Ok(MaintenanceBlock {
        id: row.get(0)?,
        room_id: row.get(1)?,
        start_date: parse_stored_date(&start_str)?,
        end_date: parse_stored_date(&end_str)?,
        blocked_units: row.get(4)?,
        reason: row.get(5)?,
    })
}

pub fn get_block(conn: &Connection, id: i64) -> anyhow::Result<Option<MaintenanceBlock>> {
    let result = conn.query_row(
        "SELECT id, room_id, start_date, end_date, blocked_units, reason
         FROM maintenance_blocks WHERE id = ?1 AND deleted_at IS NULL",
        params![id],
        |row| Ok(parse_block_row(row)),
    );

    match result {
        Ok(block) => Ok(Some(block?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Every live block for a room. Used by the conflict guard, which must scan
/// the full set.
pub fn get_blocks_for_room(conn: &Connection, room_id: i64) -> anyhow::Result<Vec<MaintenanceBlock>> {
    let mut stmt = conn.prepare(
        "SELECT id, room_id, start_date, end_date, blocked_units, reason
         FROM maintenance_blocks WHERE room_id = ?1 AND deleted_at IS NULL
         ORDER BY start_date ASC",
    )?;

    let rows = stmt.query_map(params![room_id], |row| Ok(parse_block_row(row)))?;

    let mut blocks = vec![];
    for row in rows {
        blocks.push(row??);
    }
    Ok(blocks)
}

pub fn get_blocks_for_room_in_range(
    conn: &Connection,
    room_id: i64,
    range: &DateRange,
) -> anyhow::Result<Vec<MaintenanceBlock>> {
    let mut stmt = conn.prepare(
        "SELECT id, room_id, start_date, end_date, blocked_units, reason
         FROM maintenance_blocks
         WHERE room_id = ?1 AND deleted_at IS NULL
           AND start_date < ?2 AND end_date > ?3
         ORDER BY start_date ASC",
    )?;

    let rows = stmt.query_map(
        params![room_id, fmt_date(range.end), fmt_date(range.start)],
        |row| Ok(parse_block_row(row)),
    )?;

    let mut blocks = vec![];
    for row in rows {
        blocks.push(row??);
    }
    Ok(blocks)
}

pub fn insert_block(
    conn: &Connection,
    room_id: i64,
    range: &DateRange,
    blocked_units: i64,
    reason: Option<&str>,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO maintenance_blocks (room_id, start_date, end_date, blocked_units, reason)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            room_id,
            fmt_date(range.start),
            fmt_date(range.end),
            blocked_units,
            reason,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_block(conn: &Connection, block: &MaintenanceBlock) -> anyhow::Result<()> {
    conn.execute(
        "UPDATE maintenance_blocks
         SET start_date = ?1, end_date = ?2, blocked_units = ?3, reason = ?4,
             updated_at = datetime('now')
         WHERE id = ?5 AND deleted_at IS NULL",
        params![
            fmt_date(block.start_date),
            fmt_date(block.end_date),
            block.blocked_units,
            block.reason,
            block.id,
        ],
    )?;
    Ok(())
}

pub fn soft_delete_block(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE maintenance_blocks SET deleted_at = datetime('now')
         WHERE id = ?1 AND deleted_at IS NULL",
        params![id],
    )?;
    Ok(count > 0)
}

// ── Seasonal rates ──

fn parse_rate_row(row: &rusqlite::Row) -> anyhow::Result<SeasonalRate> {
    let room_id: Option<i64> = row.get(1)?;
    let property_id: Option<i64> = row.get(2)?;
    let start_str: String = row.get(4)?;
    let end_str: String = row.get(5)?;

    let scope = match (room_id, property_id) {
        (Some(room), None) => RateScope::Room(room),
        (None, Some(property)) => RateScope::Property(property),
        _ => anyhow::bail!("seasonal rate row with invalid scope columns"),
    };

    Ok(SeasonalRate {
        id: row.get(0)?,
        scope,
        name: row.get(3)?,
        start_date: parse_stored_date(&start_str)?,
        end_date: parse_stored_date(&end_str)?,
        fixed_price: row.get(6)?,
    })
}

pub fn get_rate(conn: &Connection, id: i64) -> anyhow::Result<Option<SeasonalRate>> {
    let result = conn.query_row(
        "SELECT id, room_id, property_id, name, start_date, end_date, fixed_price
         FROM seasonal_rates WHERE id = ?1 AND deleted_at IS NULL",
        params![id],
        |row| Ok(parse_rate_row(row)),
    );

    match result {
        Ok(rate) => Ok(Some(rate?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Every live rate in a scope. The conflict guard scans this full set.
pub fn get_rates_in_scope(conn: &Connection, scope: RateScope) -> anyhow::Result<Vec<SeasonalRate>> {
    let (sql, id) = match scope {
        RateScope::Room(id) => (
            "SELECT id, room_id, property_id, name, start_date, end_date, fixed_price
             FROM seasonal_rates WHERE room_id = ?1 AND deleted_at IS NULL
             ORDER BY start_date ASC",
            id,
        ),
        RateScope::Property(id) => (
            "SELECT id, room_id, property_id, name, start_date, end_date, fixed_price
             FROM seasonal_rates WHERE property_id = ?1 AND deleted_at IS NULL
             ORDER BY start_date ASC",
            id,
        ),
    };

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![id], |row| Ok(parse_rate_row(row)))?;

    let mut rates = vec![];
    for row in rows {
        rates.push(row??);
    }
    Ok(rates)
}

pub fn get_rates_for_room_in_range(
    conn: &Connection,
    room_id: i64,
    range: &DateRange,
) -> anyhow::Result<Vec<SeasonalRate>> {
    let mut stmt = conn.prepare(
        "SELECT id, room_id, property_id, name, start_date, end_date, fixed_price
         FROM seasonal_rates
         WHERE room_id = ?1 AND deleted_at IS NULL
           AND start_date < ?2 AND end_date > ?3
         ORDER BY start_date ASC",
    )?;

    let rows = stmt.query_map(
        params![room_id, fmt_date(range.end), fmt_date(range.start)],
        |row| Ok(parse_rate_row(row)),
    )?;

    let mut rates = vec![];
    for row in rows {
        rates.push(row??);
    }
    Ok(rates)
}

pub fn get_rates_for_property_in_range(
    conn: &Connection,
    property_id: i64,
    range: &DateRange,
) -> anyhow::Result<Vec<SeasonalRate>> {
    let mut stmt = conn.prepare(
        "SELECT id, room_id, property_id, name, start_date, end_date, fixed_price
         FROM seasonal_rates
         WHERE property_id = ?1 AND deleted_at IS NULL
           AND start_date < ?2 AND end_date > ?3
         ORDER BY start_date ASC",
    )?;

    let rows = stmt.query_map(
        params![property_id, fmt_date(range.end), fmt_date(range.start)],
        |row| Ok(parse_rate_row(row)),
    )?;

    let mut rates = vec![];
    for row in rows {
        rates.push(row??);
    }
    Ok(rates)
}

pub fn insert_rate(
    conn: &Connection,
    scope: RateScope,
    name: &str,
    range: &DateRange,
    fixed_price: f64,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO seasonal_rates (room_id, property_id, name, start_date, end_date, fixed_price)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            scope.room_id(),
            scope.property_id(),
            name,
            fmt_date(range.start),
            fmt_date(range.end),
            fixed_price,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_rate(conn: &Connection, rate: &SeasonalRate) -> anyhow::Result<()> {
    conn.execute(
        "UPDATE seasonal_rates
         SET name = ?1, start_date = ?2, end_date = ?3, fixed_price = ?4,
             updated_at = datetime('now')
         WHERE id = ?5 AND deleted_at IS NULL",
        params![
            rate.name,
            fmt_date(rate.start_date),
            fmt_date(rate.end_date),
            rate.fixed_price,
            rate.id,
        ],
    )?;
    Ok(())
}

pub fn soft_delete_rate(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE seasonal_rates SET deleted_at = datetime('now')
         WHERE id = ?1 AND deleted_at IS NULL",
        params![id],
    )?;
    Ok(count > 0)
}

// ── Inventory assembly ──

/// Fetch everything the resolvers need for one property over a window:
/// rooms, per-room bookings/blocks/rates intersecting the window, and the
/// property's own rates.
pub fn load_property_inventory(
    conn: &Connection,
    property: &Property,
    range: &DateRange,
) -> anyhow::Result<PropertyInventory> {
    let rooms = get_rooms_for_property(conn, property.id)?;
    let property_rates = get_rates_for_property_in_range(conn, property.id, range)?;

    let mut room_inventories = Vec::with_capacity(rooms.len());
    for room in rooms {
        let rates = get_rates_for_room_in_range(conn, room.id, range)?;
        let bookings = get_bookings_for_room_in_range(conn, room.id, range)?;
        let blocks = get_blocks_for_room_in_range(conn, room.id, range)?;
        room_inventories.push(RoomInventory {
            room,
            rates,
            bookings,
            blocks,
        });
    }

    Ok(PropertyInventory {
        property: property.clone(),
        property_rates,
        rooms: room_inventories,
    })
}
