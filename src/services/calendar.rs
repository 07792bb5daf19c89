use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{DateRange, PropertyInventory};
use crate::services::availability::is_available;
use crate::services::pricing::resolve_rate;

/// Length of the day-by-day window served to property dashboards.
pub const CALENDAR_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize)]
pub struct RoomDayPrice {
    pub room_id: i64,
    pub price: f64,
    pub is_override: bool,
    pub blocked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Minimum price among rooms open that day, `None` when every room is
    /// blocked.
    pub lowest_price: Option<f64>,
    pub available_rooms_count: usize,
    pub room_prices: Vec<RoomDayPrice>,
}

/// Day-by-day price/occupancy summary for one property over exactly 30 days
/// starting at `start`. Uses the same availability and rate resolution as
/// search, per single day `[d, d+1)`.
pub fn calendar_30(inventory: &PropertyInventory, start: NaiveDate) -> Vec<CalendarDay> {
    (0..CALENDAR_DAYS)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let day = DateRange::single_day(date);

            let room_prices: Vec<RoomDayPrice> = inventory
                .rooms
                .iter()
                .map(|ri| {
                    let open = is_available(&ri.room, &day, 1, &ri.bookings, &ri.blocks);
                    let resolved = resolve_rate(
                        date,
                        &ri.rates,
                        &inventory.property_rates,
                        ri.room.base_price,
                    );
                    RoomDayPrice {
                        room_id: ri.room.id,
                        price: resolved.price,
                        is_override: resolved.is_override,
                        blocked: !open,
                    }
                })
                .collect();

            let available_rooms_count = room_prices.iter().filter(|rp| !rp.blocked).count();
            let lowest_price = room_prices
                .iter()
                .filter(|rp| !rp.blocked)
                .map(|rp| rp.price)
                .fold(None, |lowest: Option<f64>, price| {
                    Some(lowest.map_or(price, |l| l.min(price)))
                });

            CalendarDay {
                date,
                lowest_price,
                available_rooms_count,
                room_prices,
            }
        })
        .collect()
}
