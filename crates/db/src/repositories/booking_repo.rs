//! Repository for the `bookings` table and its dependent `booking_lines`.
//!
//! Lines are a child collection keyed by booking id. An edit replaces them
//! wholesale: update header, delete all lines, recreate lines, inside one
//! transaction.

use std::collections::HashMap;

use gearbook_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::booking::{
    Booking, BookingLine, BookingLineInput, BookingWithLines, CreateBooking, UpdateBooking,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, start_date, end_date, status, created_at, updated_at";

const LINE_COLUMNS: &str = "id, booking_id, item_id, quantity";

/// Provides CRUD operations for bookings and their lines.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a new booking with its lines, returning the created rows.
    ///
    /// If `status` is `None` in the input, defaults to `confirmed`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBooking,
    ) -> Result<BookingWithLines, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO bookings (project_id, start_date, end_date, status)
             VALUES ($1, $2, $3, COALESCE($4, 'confirmed'))
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(input.project_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.status)
            .fetch_one(&mut *tx)
            .await?;

        let lines = Self::insert_lines(&mut tx, booking.id, &input.lines).await?;

        tx.commit().await?;
        Ok(BookingWithLines { booking, lines })
    }

    /// Find a booking (with lines) by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BookingWithLines>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        let Some(booking) = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let query = format!(
            "SELECT {LINE_COLUMNS} FROM booking_lines WHERE booking_id = $1 ORDER BY id"
        );
        let lines = sqlx::query_as::<_, BookingLine>(&query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        Ok(Some(BookingWithLines { booking, lines }))
    }

    /// List all bookings with their lines, ordered by start date.
    ///
    /// This is the full snapshot the availability engine works over, so it
    /// loads everything in two queries rather than one per booking.
    pub async fn list(pool: &PgPool) -> Result<Vec<BookingWithLines>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings ORDER BY start_date, id");
        let bookings = sqlx::query_as::<_, Booking>(&query).fetch_all(pool).await?;

        let query = format!("SELECT {LINE_COLUMNS} FROM booking_lines ORDER BY booking_id, id");
        let lines = sqlx::query_as::<_, BookingLine>(&query)
            .fetch_all(pool)
            .await?;

        let mut by_booking: HashMap<DbId, Vec<BookingLine>> = HashMap::new();
        for line in lines {
            by_booking.entry(line.booking_id).or_default().push(line);
        }

        Ok(bookings
            .into_iter()
            .map(|booking| {
                let lines = by_booking.remove(&booking.id).unwrap_or_default();
                BookingWithLines { booking, lines }
            })
            .collect())
    }

    /// Update a booking. Header fields are applied only when non-`None`;
    /// the line set always replaces the stored lines wholesale.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBooking,
    ) -> Result<Option<BookingWithLines>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE bookings SET
                project_id = COALESCE($2, project_id),
                start_date = COALESCE($3, start_date),
                end_date = COALESCE($4, end_date),
                status = COALESCE($5, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(booking) = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(input.project_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.status)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM booking_lines WHERE booking_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let lines = Self::insert_lines(&mut tx, id, &input.lines).await?;

        tx.commit().await?;
        Ok(Some(BookingWithLines { booking, lines }))
    }

    /// Delete a booking by ID. Its lines are removed by cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert the given lines for `booking_id`, preserving payload order.
    async fn insert_lines(
        tx: &mut PgConnection,
        booking_id: DbId,
        inputs: &[BookingLineInput],
    ) -> Result<Vec<BookingLine>, sqlx::Error> {
        let mut lines = Vec::with_capacity(inputs.len());
        for input in inputs {
            let query = format!(
                "INSERT INTO booking_lines (booking_id, item_id, quantity)
                 VALUES ($1, $2, $3)
                 RETURNING {LINE_COLUMNS}"
            );
            let line = sqlx::query_as::<_, BookingLine>(&query)
                .bind(booking_id)
                .bind(input.item_id)
                .bind(input.quantity)
                .fetch_one(&mut *tx)
                .await?;
            lines.push(line);
        }
        Ok(lines)
    }
}
