//! Handlers for the `/items` resource.
//!
//! Lowering an item's `total_quantity` below what existing bookings demand
//! is a soft block: the response lists the affected bookings (project name
//! and date range included) and the operator repeats the request with
//! `?confirm=true` to proceed anyway.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gearbook_core::conflict::{validate_quantity_reduction, ReductionValidation};
use gearbook_core::error::CoreError;
use gearbook_core::types::DbId;
use gearbook_db::models::item::{CreateItem, Item, UpdateItem};
use gearbook_db::repositories::{GroupRepo, ItemRepo, ProjectRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult, QuantityWarning};
use crate::handlers::load_snapshot;
use crate::state::AppState;

/// Query parameter acknowledging a quantity-reduction warning.
#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// POST /api/v1/items
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<Item>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if input.total_quantity < 0 {
        return Err(AppError::BadRequest(
            "total_quantity must be non-negative".into(),
        ));
    }
    if let Some(group_id) = input.group_id {
        GroupRepo::find_by_id(&state.pool, group_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Group",
                id: group_id,
            }))?;
    }

    let item = ItemRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/v1/items
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Item>>> {
    let items = ItemRepo::list(&state.pool).await?;
    Ok(Json(items))
}

/// GET /api/v1/items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Item>> {
    let item = ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;
    Ok(Json(item))
}

/// PUT /api/v1/items/{id}?confirm=<bool>
///
/// When `total_quantity` shrinks, the reduction is validated against every
/// existing booking first. A [`AppError::NeedsConfirmation`] response lists
/// the bookings that would exceed supply; `confirm=true` overrides it.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(query): Query<ConfirmQuery>,
    Json(input): Json<UpdateItem>,
) -> AppResult<Json<Item>> {
    if let Some(total) = input.total_quantity {
        if total < 0 {
            return Err(AppError::BadRequest(
                "total_quantity must be non-negative".into(),
            ));
        }
    }
    if let Some(group_id) = input.group_id {
        GroupRepo::find_by_id(&state.pool, group_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Group",
                id: group_id,
            }))?;
    }

    let existing = ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;

    if let Some(new_total) = input.total_quantity {
        if new_total < existing.total_quantity && !query.confirm {
            check_reduction(&state, id, new_total).await?;
        }
    }

    let item = ItemRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;
    Ok(Json(item))
}

/// DELETE /api/v1/items/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = ItemRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Item", id }))
    }
}

/// Run the reduction validator and turn a soft block into a 409 carrying
/// the affected bookings, each resolved to its project name.
async fn check_reduction(state: &AppState, item_id: DbId, new_total: i32) -> AppResult<()> {
    let (bookings, items) = load_snapshot(&state.pool).await?;

    match validate_quantity_reduction(item_id, new_total, &bookings, &items) {
        ReductionValidation::Clear => Ok(()),
        ReductionValidation::NeedsConfirmation { affected } => {
            let projects: HashMap<DbId, String> = ProjectRepo::list(&state.pool)
                .await?
                .into_iter()
                .map(|p| (p.id, p.name))
                .collect();

            let affected = affected
                .into_iter()
                .map(|a| QuantityWarning {
                    booking_id: a.booking_id,
                    project_name: projects
                        .get(&a.project_id)
                        .cloned()
                        .unwrap_or_else(|| format!("project {}", a.project_id)),
                    start_date: a.start_date,
                    end_date: a.end_date,
                    requested: a.requested,
                    available_after: a.available_after,
                })
                .collect();

            tracing::info!(item_id, new_total, "Quantity reduction needs confirmation");
            Err(AppError::NeedsConfirmation { affected })
        }
    }
}
