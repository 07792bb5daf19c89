use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A reservation row, read-only to this engine. Bookings are created and
/// cancelled by the reservation flow; the engine only consumes their date
/// ranges and status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub room_id: i64,
    pub status: BookingStatus,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    WaitingForPayment,
    WaitingForConfirmation,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::WaitingForPayment => "WAITING_FOR_PAYMENT",
            BookingStatus::WaitingForConfirmation => "WAITING_FOR_CONFIRMATION",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "WAITING_FOR_PAYMENT" => BookingStatus::WaitingForPayment,
            "WAITING_FOR_CONFIRMATION" => BookingStatus::WaitingForConfirmation,
            "CONFIRMED" => BookingStatus::Confirmed,
            "COMPLETED" => BookingStatus::Completed,
            _ => BookingStatus::Cancelled,
        }
    }

    /// Only pending and confirmed stays hold inventory. Cancelled and
    /// completed bookings never block a room.
    pub fn blocks_inventory(&self) -> bool {
        matches!(
            self,
            BookingStatus::WaitingForPayment
                | BookingStatus::WaitingForConfirmation
                | BookingStatus::Confirmed
        )
    }
}

impl Booking {
    pub fn blocks_inventory(&self) -> bool {
        self.status.blocks_inventory()
    }
}
