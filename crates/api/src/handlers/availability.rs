//! Handler for the availability query endpoint.
//!
//! Exposes the raw engine result for calendar and inventory rendering. The
//! client calls this per cell/row, so the handler is two list reads plus a
//! pure computation.

use axum::extract::{Query, State};
use axum::Json;
use gearbook_core::availability::available;
use gearbook_core::types::{CalendarDate, DbId};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::load_snapshot;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /availability`.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub item_id: DbId,
    /// First day of the query range, inclusive.
    pub start: CalendarDate,
    /// Last day of the query range, inclusive.
    pub end: CalendarDate,
    /// Booking to leave out of the math, for edit forms.
    pub exclude_booking_id: Option<DbId>,
}

/// Availability report for one item over one date range.
#[derive(Debug, Serialize)]
pub struct AvailabilityReport {
    pub item_id: DbId,
    pub start: CalendarDate,
    pub end: CalendarDate,
    /// Remaining unbooked units. Negative means already oversubscribed;
    /// 0 for an unknown item is indistinguishable from depleted stock.
    pub available: i32,
}

/// GET /api/v1/availability
pub async fn query(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityQuery>,
) -> AppResult<Json<DataResponse<AvailabilityReport>>> {
    let (bookings, items) = load_snapshot(&state.pool).await?;

    let available = available(
        params.item_id,
        params.start,
        params.end,
        &bookings,
        &items,
        params.exclude_booking_id,
    );

    Ok(Json(DataResponse {
        data: AvailabilityReport {
            item_id: params.item_id,
            start: params.start,
            end: params.end,
            available,
        },
    }))
}
