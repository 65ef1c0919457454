//! Engine-facing views of bookings and stock.
//!
//! The availability math only needs a booking's id, its inclusive date range
//! and its per-item demand, and an item's stock ceiling. The `db` crate maps
//! its row types into these views before calling into the engine, keeping
//! this crate free of any persistence concern.
//!
//! Booking status (`confirmed` vs `potential`) is deliberately absent here:
//! both statuses consume availability identically, so the engine never looks
//! at it.

use serde::{Deserialize, Serialize};

use crate::types::{CalendarDate, DbId};

/// One (item, quantity) demand entry within a booking.
///
/// A booking may carry more than one line for the same item; the engine
/// treats duplicates as additive demand rather than rejecting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDemand {
    pub item_id: DbId,
    pub quantity: i32,
}

/// A booking reduced to what the availability math needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingWindow {
    pub id: DbId,
    pub project_id: DbId,
    /// First booked day, inclusive.
    pub start_date: CalendarDate,
    /// Last booked day, inclusive.
    pub end_date: CalendarDate,
    pub lines: Vec<LineDemand>,
}

impl BookingWindow {
    /// Total demand this booking places on `item_id` (duplicate lines sum).
    pub fn demand_for(&self, item_id: DbId) -> i32 {
        self.lines
            .iter()
            .filter(|line| line.item_id == item_id)
            .map(|line| line.quantity)
            .sum()
    }

    /// Whether this booking overlaps the inclusive range `[start, end]`.
    pub fn overlaps(&self, start: CalendarDate, end: CalendarDate) -> bool {
        ranges_overlap(self.start_date, self.end_date, start, end)
    }
}

/// An item reduced to its stock ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockItem {
    pub id: DbId,
    /// Absolute ceiling of units that can ever be booked simultaneously.
    pub total_quantity: i32,
}

/// Inclusive overlap test between two calendar date ranges.
///
/// `[s1, e1]` and `[s2, e2]` overlap iff `s1 <= e2 && e1 >= s2`, so a shared
/// boundary day counts as overlap. No normalization is performed; a reversed
/// range yields whatever this test yields.
pub fn ranges_overlap(
    s1: CalendarDate,
    e1: CalendarDate,
    s2: CalendarDate,
    e2: CalendarDate,
) -> bool {
    s1 <= e2 && e1 >= s2
}
