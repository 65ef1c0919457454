//! Request handlers, one module per resource.

pub mod availability;
pub mod booking;
pub mod group;
pub mod item;
pub mod project;

use gearbook_core::booking::{BookingWindow, StockItem};
use gearbook_db::repositories::{BookingRepo, ItemRepo};
use sqlx::PgPool;

/// Load the point-in-time snapshot the availability engine works over:
/// every booking (with lines) and every item's stock ceiling.
///
/// Validation is only as fresh as this snapshot; there is no locking, so
/// two concurrent edits can both pass against stale data. Accepted for a
/// single-operator tool.
pub(crate) async fn load_snapshot(
    pool: &PgPool,
) -> Result<(Vec<BookingWindow>, Vec<StockItem>), sqlx::Error> {
    let bookings = BookingRepo::list(pool).await?;
    let items = ItemRepo::list(pool).await?;
    Ok((
        bookings.iter().map(|b| b.window()).collect(),
        items.iter().map(|i| i.stock()).collect(),
    ))
}
