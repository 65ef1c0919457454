//! Route definition for the availability query endpoint.

use axum::routing::get;
use axum::Router;

use crate::handlers::availability;
use crate::state::AppState;

/// Routes mounted directly under `/api/v1`.
///
/// ```text
/// GET /availability?item_id&start&end[&exclude_booking_id] -> query
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/availability", get(availability::query))
}
