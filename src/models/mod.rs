pub mod booking;
pub mod date;
pub mod inventory;
pub mod maintenance;
pub mod property;
pub mod rate;

pub use booking::{Booking, BookingStatus};
pub use date::DateRange;
pub use inventory::{PropertyInventory, RoomInventory};
pub use maintenance::{BlockPatch, MaintenanceBlock};
pub use property::{Property, PropertyStatus, Room};
pub use rate::{RatePatch, RateScope, SeasonalRate};
