use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{DateRange, PropertyInventory};
use crate::services::availability::is_available;
use crate::services::pricing::resolve_rate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Price,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct SearchParams {
    pub range: DateRange,
    pub guests: i64,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub page: usize,
    pub take: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomQuote {
    pub room_id: i64,
    pub room_name: String,
    pub price: f64,
    pub is_override: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyResult {
    pub property_id: i64,
    pub name: String,
    /// Minimum nightly price among the property's available rooms.
    pub display_price: f64,
    pub rooms: Vec<RoomQuote>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub page: usize,
    pub take: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub data: Vec<PropertyResult>,
    pub meta: PageMeta,
}

/// Availability + quote for every room of one property. Returns `None` when
/// no room can take the stay, which drops the property from search results.
/// Quotes are priced at the check-in date.
pub fn price_property(
    inventory: &PropertyInventory,
    range: &DateRange,
    guests: i64,
) -> Option<PropertyResult> {
    let rooms: Vec<RoomQuote> = inventory
        .rooms
        .iter()
        .filter(|ri| is_available(&ri.room, range, guests, &ri.bookings, &ri.blocks))
        .map(|ri| {
            let resolved = resolve_rate(
                range.start,
                &ri.rates,
                &inventory.property_rates,
                ri.room.base_price,
            );
            RoomQuote {
                room_id: ri.room.id,
                room_name: ri.room.name.clone(),
                price: resolved.price,
                is_override: resolved.is_override,
            }
        })
        .collect();

    if rooms.is_empty() {
        return None;
    }

    let display_price = rooms.iter().map(|q| q.price).fold(f64::INFINITY, f64::min);

    Some(PropertyResult {
        property_id: inventory.property.id,
        name: inventory.property.name.clone(),
        display_price,
        rooms,
    })
}

/// Rank and paginate candidate properties. The full candidate set is priced
/// and sorted before the page is sliced; paginating earlier would corrupt
/// the ordering.
pub fn search(candidates: &[PropertyInventory], params: &SearchParams) -> SearchPage {
    let mut results: Vec<PropertyResult> = candidates
        .iter()
        .filter_map(|inventory| price_property(inventory, &params.range, params.guests))
        .collect();

    results.sort_by(|a, b| {
        let ordering = match params.sort_by {
            SortBy::Price => a
                .display_price
                .partial_cmp(&b.display_price)
                .unwrap_or(Ordering::Equal),
            SortBy::Name => a.name.cmp(&b.name),
        };
        match params.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let total = results.len();
    let page = params.page.max(1);
    let take = params.take.max(1);
    let data: Vec<PropertyResult> = results
        .into_iter()
        .skip((page - 1) * take)
        .take(take)
        .collect();

    SearchPage {
        data,
        meta: PageMeta { page, take, total },
    }
}
