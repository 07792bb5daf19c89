use serde::Serialize;

use crate::models::{Booking, MaintenanceBlock, Property, Room, SeasonalRate};

/// One room with the rows the resolvers need for a query window, fetched
/// upfront so the engine stays pure.
#[derive(Debug, Clone, Serialize)]
pub struct RoomInventory {
    pub room: Room,
    pub rates: Vec<SeasonalRate>,
    pub bookings: Vec<Booking>,
    pub blocks: Vec<MaintenanceBlock>,
}

/// A candidate property with its rooms' inventories and its own
/// property-level seasonal rates.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyInventory {
    pub property: Property,
    pub property_rates: Vec<SeasonalRate>,
    pub rooms: Vec<RoomInventory>,
}
