use chrono::NaiveDate;
use serde::Serialize;

use crate::models::SeasonalRate;

/// The effective nightly price for one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedRate {
    pub price: f64,
    pub is_override: bool,
}

/// Pick the nightly price for `date` among the candidate seasonal rates.
///
/// Room-level rates always beat property-level rates, regardless of date
/// recency. Within a level, overlapping candidates should not exist (the
/// conflict guard forbids them), but if they do the latest-starting rate
/// wins. With no match at either level the room's base price applies.
///
/// Never fails: absent data degrades to the base price.
pub fn resolve_rate(
    date: NaiveDate,
    room_rates: &[SeasonalRate],
    property_rates: &[SeasonalRate],
    base_price: f64,
) -> ResolvedRate {
    if let Some(rate) = pick_applicable(date, room_rates) {
        return ResolvedRate {
            price: rate.fixed_price,
            is_override: true,
        };
    }
    if let Some(rate) = pick_applicable(date, property_rates) {
        return ResolvedRate {
            price: rate.fixed_price,
            is_override: true,
        };
    }
    ResolvedRate {
        price: base_price,
        is_override: false,
    }
}

fn pick_applicable(date: NaiveDate, candidates: &[SeasonalRate]) -> Option<&SeasonalRate> {
    candidates
        .iter()
        .filter(|rate| rate.applies_on(date))
        .max_by_key(|rate| rate.start_date)
}
