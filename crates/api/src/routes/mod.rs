pub mod availability;
pub mod booking;
pub mod group;
pub mod health;
pub mod item;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /items                      list, create
/// /items/{id}                 get, update (quantity-reduction check), delete
///
/// /groups                     list, create
/// /groups/{id}                get, update, delete (members become ungrouped)
///
/// /projects                   list, create
/// /projects/{id}              get, update, delete
///
/// /bookings                   list, create (conflict-checked)
/// /bookings/{id}              get, update (conflict-checked), delete
///
/// /availability               remaining units for an item over a date range
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/items", item::router())
        .nest("/groups", group::router())
        .nest("/projects", project::router())
        .nest("/bookings", booking::router())
        .merge(availability::router())
}
