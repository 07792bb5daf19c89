use crate::models::date::overlaps;
use crate::models::{Booking, DateRange, MaintenanceBlock, Room};

/// Decide whether a room can take a stay over `range` for `guests` people.
///
/// The room must sleep the party, and no maintenance block or
/// inventory-holding booking may intersect the range. An overlapping block
/// or booking removes the whole room: `total_units` and `blocked_units` are
/// deliberately not consulted (see the capacity test below).
///
/// Never fails: missing data reads as unavailable or unrestricted, not as an
/// error.
pub fn is_available(
    room: &Room,
    range: &DateRange,
    guests: i64,
    bookings: &[Booking],
    blocks: &[MaintenanceBlock],
) -> bool {
    if room.total_guests < guests {
        return false;
    }

    let blocked = blocks.iter().any(|block| {
        block.room_id == room.id
            && overlaps(block.start_date, block.end_date, range.start, range.end)
    });
    if blocked {
        return false;
    }

    let booked = bookings.iter().any(|booking| {
        booking.room_id == room.id
            && booking.blocks_inventory()
            && overlaps(booking.check_in, booking.check_out, range.start, range.end)
    });

    !booked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(d(start), d(end)).unwrap()
    }

    fn room(id: i64, total_units: i64, total_guests: i64) -> Room {
        Room {
            id,
            property_id: 1,
            name: format!("room-{id}"),
            base_price: 100.0,
            total_units,
            total_guests,
        }
    }

    fn booking(room_id: i64, status: BookingStatus, check_in: &str, check_out: &str) -> Booking {
        Booking {
            id: uuid::Uuid::new_v4().to_string(),
            room_id,
            status,
            check_in: d(check_in),
            check_out: d(check_out),
        }
    }

    fn block(room_id: i64, start: &str, end: &str) -> MaintenanceBlock {
        MaintenanceBlock {
            id: 1,
            room_id,
            start_date: d(start),
            end_date: d(end),
            blocked_units: 1,
            reason: None,
        }
    }

    #[test]
    fn test_available_when_nothing_conflicts() {
        let room = room(1, 1, 2);
        assert!(is_available(&room, &range("2025-06-10", "2025-06-15"), 2, &[], &[]));
    }

    #[test]
    fn test_guest_capacity_is_enforced() {
        let room = room(1, 1, 2);
        assert!(!is_available(&room, &range("2025-06-10", "2025-06-15"), 3, &[], &[]));
    }

    #[test]
    fn test_active_booking_blocks_the_range() {
        let room = room(1, 1, 2);
        let bookings = vec![booking(1, BookingStatus::Confirmed, "2025-06-12", "2025-06-14")];
        assert!(!is_available(&room, &range("2025-06-10", "2025-06-15"), 2, &bookings, &[]));
    }

    #[test]
    fn test_cancelled_and_completed_bookings_do_not_block() {
        let room = room(1, 1, 2);
        let bookings = vec![
            booking(1, BookingStatus::Cancelled, "2025-06-10", "2025-06-15"),
            booking(1, BookingStatus::Completed, "2025-06-10", "2025-06-15"),
        ];
        assert!(is_available(&room, &range("2025-06-10", "2025-06-15"), 2, &bookings, &[]));
    }

    #[test]
    fn test_pending_statuses_hold_inventory() {
        let room = room(1, 1, 2);
        for status in [
            BookingStatus::WaitingForPayment,
            BookingStatus::WaitingForConfirmation,
        ] {
            let bookings = vec![booking(1, status, "2025-06-10", "2025-06-15")];
            assert!(!is_available(&room, &range("2025-06-12", "2025-06-13"), 1, &bookings, &[]));
        }
    }

    #[test]
    fn test_back_to_back_stay_is_allowed() {
        let room = room(1, 1, 2);
        let bookings = vec![booking(1, BookingStatus::Confirmed, "2025-06-10", "2025-06-15")];
        assert!(is_available(&room, &range("2025-06-15", "2025-06-20"), 2, &bookings, &[]));
    }

    #[test]
    fn test_maintenance_block_blocks_the_range() {
        let room = room(1, 1, 2);
        let blocks = vec![block(1, "2025-06-12", "2025-06-14")];
        assert!(!is_available(&room, &range("2025-06-10", "2025-06-15"), 2, &[], &blocks));
        assert!(is_available(&room, &range("2025-06-14", "2025-06-20"), 2, &[], &blocks));
    }

    #[test]
    fn test_other_rooms_rows_are_ignored() {
        let room = room(1, 1, 2);
        let bookings = vec![booking(2, BookingStatus::Confirmed, "2025-06-10", "2025-06-15")];
        let blocks = vec![block(2, "2025-06-10", "2025-06-15")];
        assert!(is_available(&room, &range("2025-06-10", "2025-06-15"), 2, &bookings, &blocks));
    }

    // Known limitation, preserved on purpose: one overlapping active booking
    // makes a multi-unit room unavailable even though two more units sit
    // idle. Same for blocks with blocked_units < total_units.
    #[test]
    fn test_multi_unit_room_is_capacity_insensitive() {
        let room = room(1, 3, 2);
        let bookings = vec![booking(1, BookingStatus::Confirmed, "2025-06-01", "2025-06-05")];
        assert!(!is_available(&room, &range("2025-06-03", "2025-06-07"), 2, &bookings, &[]));
        assert!(!is_available(&room, &range("2025-06-01", "2025-06-05"), 2, &bookings, &[]));
        assert!(is_available(&room, &range("2025-06-05", "2025-06-09"), 2, &bookings, &[]));
    }
}
