//! Handlers for the `/bookings` resource.
//!
//! Every create/update runs the save validator before touching the store:
//! a line asking for more than is available over the booking's date range is
//! a hard 409, with the offending lines spelled out. Validation gates the
//! write, so a refused save leaves persisted state untouched and the client
//! free to retry.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gearbook_core::booking::{BookingWindow, LineDemand, StockItem};
use gearbook_core::conflict::{validate_booking_save, BookingDraft, SaveValidation};
use gearbook_core::error::CoreError;
use gearbook_core::types::{CalendarDate, DbId};
use gearbook_db::models::booking::{
    BookingLineInput, BookingWithLines, CreateBooking, UpdateBooking,
};
use gearbook_db::repositories::{BookingRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::load_snapshot;
use crate::state::AppState;

/// POST /api/v1/bookings
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<BookingWithLines>)> {
    check_dates(input.start_date, input.end_date)?;
    check_lines(&input.lines)?;

    ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        }))?;

    let (bookings, items) = load_snapshot(&state.pool).await?;
    check_items_exist(&input.lines, &items)?;

    let draft = BookingDraft {
        booking_id: None,
        start_date: input.start_date,
        end_date: input.end_date,
        lines: to_demands(&input.lines),
    };
    check_availability(&draft, &bookings, &items)?;

    let booking = BookingRepo::create(&state.pool, &input).await?;
    tracing::info!(
        booking_id = booking.booking.id,
        project_id = booking.booking.project_id,
        "Booking created",
    );
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/v1/bookings
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<BookingWithLines>>> {
    let bookings = BookingRepo::list(&state.pool).await?;
    Ok(Json(bookings))
}

/// GET /api/v1/bookings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<BookingWithLines>> {
    let booking = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;
    Ok(Json(booking))
}

/// PUT /api/v1/bookings/{id}
///
/// The stored line set is replaced wholesale by `lines`. The booking's own
/// prior reservation is excluded from the availability math, so shrinking
/// or moving a booking never conflicts with itself.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBooking>,
) -> AppResult<Json<BookingWithLines>> {
    let existing = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;

    let start_date = input.start_date.unwrap_or(existing.booking.start_date);
    let end_date = input.end_date.unwrap_or(existing.booking.end_date);
    check_dates(start_date, end_date)?;
    check_lines(&input.lines)?;

    if let Some(project_id) = input.project_id {
        ProjectRepo::find_by_id(&state.pool, project_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }))?;
    }

    let (bookings, items) = load_snapshot(&state.pool).await?;
    check_items_exist(&input.lines, &items)?;

    let draft = BookingDraft {
        booking_id: Some(id),
        start_date,
        end_date,
        lines: to_demands(&input.lines),
    };
    check_availability(&draft, &bookings, &items)?;

    let booking = BookingRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;
    tracing::info!(booking_id = id, "Booking updated");
    Ok(Json(booking))
}

/// DELETE /api/v1/bookings/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = BookingRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn check_dates(start: CalendarDate, end: CalendarDate) -> AppResult<()> {
    if start > end {
        return Err(AppError::BadRequest(
            "start_date must not be after end_date".into(),
        ));
    }
    Ok(())
}

fn check_lines(lines: &[BookingLineInput]) -> AppResult<()> {
    for line in lines {
        if line.quantity <= 0 {
            return Err(AppError::BadRequest(format!(
                "quantity for item {} must be positive",
                line.item_id
            )));
        }
    }
    Ok(())
}

fn check_items_exist(lines: &[BookingLineInput], items: &[StockItem]) -> AppResult<()> {
    for line in lines {
        if !items.iter().any(|item| item.id == line.item_id) {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Item",
                id: line.item_id,
            }));
        }
    }
    Ok(())
}

fn check_availability(
    draft: &BookingDraft,
    bookings: &[BookingWindow],
    items: &[StockItem],
) -> AppResult<()> {
    match validate_booking_save(draft, bookings, items) {
        SaveValidation::Clear => Ok(()),
        SaveValidation::Blocked { conflicts } => {
            tracing::info!(conflict_count = conflicts.len(), "Booking save blocked");
            Err(AppError::BookingConflict { conflicts })
        }
    }
}

fn to_demands(lines: &[BookingLineInput]) -> Vec<LineDemand> {
    lines
        .iter()
        .map(|line| LineDemand {
            item_id: line.item_id,
            quantity: line.quantity,
        })
        .collect()
}
