//! The availability engine: remaining unbooked units of an item over an
//! inclusive date range, given a point-in-time snapshot of all bookings.
//!
//! This is invoked per-cell in calendar rendering and per-row in inventory
//! listings, so it stays a cheap O(bookings × lines) scan with no caching
//! and no allocation.

use crate::booking::{BookingWindow, StockItem};
use crate::types::{CalendarDate, DbId};

/// Remaining unbooked units of `item_id` over `[range_start, range_end]`.
///
/// Every booking whose inclusive date range overlaps the query range counts
/// its line quantities for `item_id` against the item's `total_quantity`.
/// Booking status is irrelevant: potential bookings consume availability the
/// same as confirmed ones.
///
/// - `exclude_booking_id` removes one booking from consideration; used when
///   editing a booking so it does not count against its own prior
///   reservation.
/// - An `item_id` not present in `items` yields 0, not an error. Callers
///   relying on 0 to mean "out of stock" cannot distinguish unknown items
///   from depleted ones.
/// - The result may be negative when the item is already over-committed;
///   callers must surface that, not clamp it to zero.
/// - The range is not normalized: callers are responsible for
///   `range_start <= range_end`, and a reversed range simply yields whatever
///   the inclusive overlap test yields.
pub fn available(
    item_id: DbId,
    range_start: CalendarDate,
    range_end: CalendarDate,
    bookings: &[BookingWindow],
    items: &[StockItem],
    exclude_booking_id: Option<DbId>,
) -> i32 {
    let Some(item) = items.iter().find(|item| item.id == item_id) else {
        return 0;
    };

    let booked: i32 = bookings
        .iter()
        .filter(|booking| Some(booking.id) != exclude_booking_id)
        .filter(|booking| booking.overlaps(range_start, range_end))
        .map(|booking| booking.demand_for(item_id))
        .sum();

    item.total_quantity - booked
}
