//! Handlers for the `/groups` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gearbook_core::error::CoreError;
use gearbook_core::types::DbId;
use gearbook_db::models::group::{CreateGroup, Group, UpdateGroup};
use gearbook_db::repositories::GroupRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/groups
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateGroup>,
) -> AppResult<(StatusCode, Json<Group>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    let group = GroupRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// GET /api/v1/groups
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Group>>> {
    let groups = GroupRepo::list(&state.pool).await?;
    Ok(Json(groups))
}

/// GET /api/v1/groups/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Group>> {
    let group = GroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Group",
            id,
        }))?;
    Ok(Json(group))
}

/// PUT /api/v1/groups/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGroup>,
) -> AppResult<Json<Group>> {
    let group = GroupRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Group",
            id,
        }))?;
    Ok(Json(group))
}

/// DELETE /api/v1/groups/{id}
///
/// Member items survive and become ungrouped (`group_id = NULL`).
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = GroupRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Group",
            id,
        }))
    }
}
