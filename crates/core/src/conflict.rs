//! The booking conflict validator.
//!
//! Applies the availability engine when a booking is about to be saved or an
//! item's stock ceiling is about to be lowered, and returns a decision for
//! the caller to act on. Nothing here prompts or persists: the hard-block
//! and needs-confirmation outcomes are plain values, and the HTTP layer maps
//! them onto 409 responses (the soft one overridable with an explicit
//! confirmation).
//!
//! The state machine for one save attempt is
//! `Idle -> Validating -> { Blocked | Warned -> { Confirmed -> Proceed |
//! Cancelled -> Idle } | Clear -> Proceed }`; only Proceed reaches the
//! store. Validation gates the write, it never rolls one back, so a failed
//! attempt leaves persisted state untouched.

use serde::Serialize;

use crate::availability::available;
use crate::booking::{BookingWindow, LineDemand, StockItem};
use crate::types::{CalendarDate, DbId};

// ---------------------------------------------------------------------------
// Saving a booking (hard block)
// ---------------------------------------------------------------------------

/// The booking a caller wants to persist, before it exists in the snapshot.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    /// `Some` when editing an existing booking. The prior version is then
    /// excluded from the availability math so the booking does not count
    /// against its own reservation.
    pub booking_id: Option<DbId>,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    pub lines: Vec<LineDemand>,
}

/// One line of a draft that asks for more than the item has left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineConflict {
    pub item_id: DbId,
    /// Total requested across the draft's lines for this item.
    pub requested: i32,
    /// What the engine says is left over the draft's date range.
    pub available: i32,
}

/// Outcome of validating a booking save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveValidation {
    /// Every line fits; the caller may persist.
    Clear,
    /// At least one line exceeds supply. No override exists for this case.
    Blocked { conflicts: Vec<LineConflict> },
}

/// Validate a new or edited booking against the current snapshot.
///
/// Duplicate draft lines for the same item are summed before checking, so a
/// draft asking for 4 + 3 chairs is treated as one demand of 7. Each summed
/// demand is checked against [`available`] over the draft's own date range,
/// with the draft's prior version (if any) excluded.
pub fn validate_booking_save(
    draft: &BookingDraft,
    bookings: &[BookingWindow],
    items: &[StockItem],
) -> SaveValidation {
    let mut conflicts = Vec::new();

    for demand in summed_lines(&draft.lines) {
        let remaining = available(
            demand.item_id,
            draft.start_date,
            draft.end_date,
            bookings,
            items,
            draft.booking_id,
        );
        if demand.quantity > remaining {
            conflicts.push(LineConflict {
                item_id: demand.item_id,
                requested: demand.quantity,
                available: remaining,
            });
        }
    }

    if conflicts.is_empty() {
        SaveValidation::Clear
    } else {
        SaveValidation::Blocked { conflicts }
    }
}

/// Collapse duplicate lines per item, preserving first-seen order.
fn summed_lines(lines: &[LineDemand]) -> Vec<LineDemand> {
    let mut summed: Vec<LineDemand> = Vec::with_capacity(lines.len());
    for line in lines {
        match summed.iter_mut().find(|l| l.item_id == line.item_id) {
            Some(existing) => existing.quantity += line.quantity,
            None => summed.push(*line),
        }
    }
    summed
}

// ---------------------------------------------------------------------------
// Lowering an item's stock ceiling (soft block)
// ---------------------------------------------------------------------------

/// An existing booking that would no longer fit under a reduced total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AffectedBooking {
    pub booking_id: DbId,
    /// The operator is warned with the project, so callers can resolve this
    /// id to a name.
    pub project_id: DbId,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    /// What this booking demands of the item.
    pub requested: i32,
    /// What would remain for this booking under the new total, everything
    /// else in its window unchanged. Negative means the shortfall.
    pub available_after: i32,
}

/// Outcome of validating an item quantity reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReductionValidation {
    /// The new total still covers every existing booking.
    Clear,
    /// One or more bookings would exceed supply. The operator may proceed
    /// anyway with an explicit confirmation, or cancel the change.
    NeedsConfirmation { affected: Vec<AffectedBooking> },
}

/// Check whether lowering `item_id`'s total to `new_total` would strand any
/// existing booking.
///
/// For each booking demanding the item, the availability it would see under
/// the new total is `new_total` minus the demand of everything else in its
/// own window (the booking itself excluded, same as when editing). Bookings
/// whose demand exceeds that figure are reported.
///
/// An `item_id` not present in `items` has no demand recorded against it in
/// any meaningful sense, so the result is `Clear`.
pub fn validate_quantity_reduction(
    item_id: DbId,
    new_total: i32,
    bookings: &[BookingWindow],
    items: &[StockItem],
) -> ReductionValidation {
    let Some(item) = items.iter().find(|item| item.id == item_id) else {
        return ReductionValidation::Clear;
    };

    let mut affected = Vec::new();

    for booking in bookings {
        let requested = booking.demand_for(item_id);
        if requested == 0 {
            continue;
        }

        // Demand from everything else overlapping this booking's window,
        // derived from the engine so the two stay consistent.
        let available_excluding_self = available(
            item_id,
            booking.start_date,
            booking.end_date,
            bookings,
            items,
            Some(booking.id),
        );
        let others_demand = item.total_quantity - available_excluding_self;
        let available_after = new_total - others_demand;

        if requested > available_after {
            affected.push(AffectedBooking {
                booking_id: booking.id,
                project_id: booking.project_id,
                start_date: booking.start_date,
                end_date: booking.end_date,
                requested,
                available_after,
            });
        }
    }

    if affected.is_empty() {
        ReductionValidation::Clear
    } else {
        ReductionValidation::NeedsConfirmation { affected }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn booking(
        id: i64,
        start: NaiveDate,
        end: NaiveDate,
        lines: &[(i64, i32)],
    ) -> BookingWindow {
        BookingWindow {
            id,
            project_id: id * 10,
            start_date: start,
            end_date: end,
            lines: lines
                .iter()
                .map(|&(item_id, quantity)| LineDemand { item_id, quantity })
                .collect(),
        }
    }

    const CHAIR: i64 = 1;

    fn chairs(total: i32) -> Vec<StockItem> {
        vec![StockItem {
            id: CHAIR,
            total_quantity: total,
        }]
    }

    fn draft(
        booking_id: Option<i64>,
        start: NaiveDate,
        end: NaiveDate,
        lines: &[(i64, i32)],
    ) -> BookingDraft {
        BookingDraft {
            booking_id,
            start_date: start,
            end_date: end,
            lines: lines
                .iter()
                .map(|&(item_id, quantity)| LineDemand { item_id, quantity })
                .collect(),
        }
    }

    // The chair scenario: 10 chairs, A holds 6 over 03-01..03-10,
    // B holds 3 over 03-08..03-15.
    fn chair_scenario() -> Vec<BookingWindow> {
        vec![
            booking(1, d(2024, 3, 1), d(2024, 3, 10), &[(CHAIR, 6)]),
            booking(2, d(2024, 3, 8), d(2024, 3, 15), &[(CHAIR, 3)]),
        ]
    }

    // -----------------------------------------------------------------------
    // Saving a booking
    // -----------------------------------------------------------------------

    #[test]
    fn new_booking_within_supply_is_clear() {
        let candidate = draft(None, d(2024, 3, 9), d(2024, 3, 9), &[(CHAIR, 1)]);
        let result = validate_booking_save(&candidate, &chair_scenario(), &chairs(10));
        assert_eq!(result, SaveValidation::Clear);
    }

    #[test]
    fn new_booking_exceeding_supply_is_blocked() {
        let candidate = draft(None, d(2024, 3, 9), d(2024, 3, 9), &[(CHAIR, 2)]);
        let result = validate_booking_save(&candidate, &chair_scenario(), &chairs(10));
        assert_matches!(result, SaveValidation::Blocked { conflicts } => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].item_id, CHAIR);
            assert_eq!(conflicts[0].requested, 2);
            assert_eq!(conflicts[0].available, 1);
        });
    }

    #[test]
    fn edit_raising_within_supply_is_clear() {
        // Raise A from 6 to 7 while B holds 3 in the shared window:
        // 7 + 3 == 10 still fits.
        let candidate = draft(Some(1), d(2024, 3, 1), d(2024, 3, 10), &[(CHAIR, 7)]);
        let result = validate_booking_save(&candidate, &chair_scenario(), &chairs(10));
        assert_eq!(result, SaveValidation::Clear);
    }

    #[test]
    fn edit_to_five_chairs_passes() {
        let candidate = draft(Some(1), d(2024, 3, 1), d(2024, 3, 10), &[(CHAIR, 5)]);
        let result = validate_booking_save(&candidate, &chair_scenario(), &chairs(10));
        assert_eq!(result, SaveValidation::Clear);
    }

    #[test]
    fn edit_to_eight_chairs_blocks() {
        let candidate = draft(Some(1), d(2024, 3, 1), d(2024, 3, 10), &[(CHAIR, 8)]);
        let result = validate_booking_save(&candidate, &chair_scenario(), &chairs(10));
        assert_matches!(result, SaveValidation::Blocked { conflicts } => {
            assert_eq!(conflicts[0].requested, 8);
            assert_eq!(conflicts[0].available, 7);
        });
    }

    #[test]
    fn duplicate_draft_lines_sum_before_checking() {
        // 4 + 3 chairs in two lines is a demand of 7 against 10 free.
        let candidate = draft(
            None,
            d(2024, 6, 1),
            d(2024, 6, 3),
            &[(CHAIR, 4), (CHAIR, 3)],
        );
        assert_eq!(
            validate_booking_save(&candidate, &[], &chairs(10)),
            SaveValidation::Clear
        );

        let candidate = draft(
            None,
            d(2024, 6, 1),
            d(2024, 6, 3),
            &[(CHAIR, 6), (CHAIR, 6)],
        );
        assert_matches!(
            validate_booking_save(&candidate, &[], &chairs(10)),
            SaveValidation::Blocked { conflicts } => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].requested, 12);
                assert_eq!(conflicts[0].available, 10);
            }
        );
    }

    #[test]
    fn unknown_item_in_draft_is_blocked_as_zero_available() {
        let candidate = draft(None, d(2024, 6, 1), d(2024, 6, 3), &[(99, 1)]);
        assert_matches!(
            validate_booking_save(&candidate, &[], &chairs(10)),
            SaveValidation::Blocked { conflicts } => {
                assert_eq!(conflicts[0].available, 0);
            }
        );
    }

    // -----------------------------------------------------------------------
    // Lowering an item's total
    // -----------------------------------------------------------------------

    #[test]
    fn reduction_above_all_demand_is_clear() {
        // Peak overlapping demand is 9 (03-08..03-10).
        let result = validate_quantity_reduction(CHAIR, 9, &chair_scenario(), &chairs(10));
        assert_eq!(result, ReductionValidation::Clear);
    }

    #[test]
    fn reduction_below_peak_demand_needs_confirmation() {
        let result = validate_quantity_reduction(CHAIR, 8, &chair_scenario(), &chairs(10));
        assert_matches!(result, ReductionValidation::NeedsConfirmation { affected } => {
            // A needs 6 with 3 held by B in its window: 8 - 3 = 5 < 6.
            // B needs 3 with 6 held by A in its window: 8 - 6 = 2 < 3.
            assert_eq!(affected.len(), 2);
            assert_eq!(affected[0].booking_id, 1);
            assert_eq!(affected[0].requested, 6);
            assert_eq!(affected[0].available_after, 5);
            assert_eq!(affected[1].booking_id, 2);
            assert_eq!(affected[1].requested, 3);
            assert_eq!(affected[1].available_after, 2);
        });
    }

    #[test]
    fn reduction_reports_date_range_and_project() {
        let result = validate_quantity_reduction(CHAIR, 0, &chair_scenario(), &chairs(10));
        assert_matches!(result, ReductionValidation::NeedsConfirmation { affected } => {
            assert_eq!(affected[0].project_id, 10);
            assert_eq!(affected[0].start_date, d(2024, 3, 1));
            assert_eq!(affected[0].end_date, d(2024, 3, 10));
        });
    }

    #[test]
    fn bookings_without_the_item_are_ignored() {
        let mut bookings = chair_scenario();
        bookings.push(booking(3, d(2024, 3, 1), d(2024, 3, 31), &[(2, 50)]));
        let result = validate_quantity_reduction(CHAIR, 9, &bookings, &chairs(10));
        assert_eq!(result, ReductionValidation::Clear);
    }

    #[test]
    fn unknown_item_reduction_is_clear() {
        let result = validate_quantity_reduction(99, 0, &chair_scenario(), &chairs(10));
        assert_eq!(result, ReductionValidation::Clear);
    }

    #[test]
    fn non_overlapping_bookings_do_not_compound() {
        // Two disjoint bookings of 6 each: lowering to 6 still fits both.
        let bookings = vec![
            booking(1, d(2024, 3, 1), d(2024, 3, 5), &[(CHAIR, 6)]),
            booking(2, d(2024, 3, 10), d(2024, 3, 15), &[(CHAIR, 6)]),
        ];
        assert_eq!(
            validate_quantity_reduction(CHAIR, 6, &bookings, &chairs(10)),
            ReductionValidation::Clear
        );
        assert_matches!(
            validate_quantity_reduction(CHAIR, 5, &bookings, &chairs(10)),
            ReductionValidation::NeedsConfirmation { affected } => {
                assert_eq!(affected.len(), 2);
            }
        );
    }
}
