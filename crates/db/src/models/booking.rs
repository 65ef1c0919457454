//! Booking entity model, line items, and DTOs.
//!
//! A booking owns its lines: on edit the lines are deleted and recreated
//! wholesale, there is no partial line diffing. `BookingWithLines` is the
//! shape handlers work with and what serializes to clients.

use gearbook_core::booking::{BookingWindow, LineDemand};
use gearbook_core::types::{CalendarDate, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Booking status. Both statuses consume availability identically; the
/// distinction is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Potential,
}

/// A booking row from the `bookings` table, without its lines.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub project_id: DbId,
    /// First booked day, inclusive.
    pub start_date: CalendarDate,
    /// Last booked day, inclusive.
    pub end_date: CalendarDate,
    pub status: BookingStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A line row from the `booking_lines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingLine {
    pub id: DbId,
    pub booking_id: DbId,
    pub item_id: DbId,
    pub quantity: i32,
}

/// A booking together with its lines, in stored order.
#[derive(Debug, Clone, Serialize)]
pub struct BookingWithLines {
    #[serde(flatten)]
    pub booking: Booking,
    pub lines: Vec<BookingLine>,
}

impl BookingWithLines {
    /// The engine view of this booking.
    pub fn window(&self) -> BookingWindow {
        BookingWindow {
            id: self.booking.id,
            project_id: self.booking.project_id,
            start_date: self.booking.start_date,
            end_date: self.booking.end_date,
            lines: self
                .lines
                .iter()
                .map(|line| LineDemand {
                    item_id: line.item_id,
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

/// One (item, quantity) entry in a create/update payload.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BookingLineInput {
    pub item_id: DbId,
    pub quantity: i32,
}

/// DTO for creating a new booking with its lines.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub project_id: DbId,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    /// Defaults to `confirmed` if omitted.
    pub status: Option<BookingStatus>,
    pub lines: Vec<BookingLineInput>,
}

/// DTO for updating an existing booking. Header fields are optional; the
/// full line set is always supplied and replaces the stored lines
/// wholesale.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBooking {
    pub project_id: Option<DbId>,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub status: Option<BookingStatus>,
    pub lines: Vec<BookingLineInput>,
}
