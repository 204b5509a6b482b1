use crate::{error::AppError, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use core_types::{Platform, PlatformInput, RecordId};
use std::sync::Arc;

/// # GET /api/platforms
pub async fn list_platforms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Platform>>, AppError> {
    let platforms = state.store.get_all_platforms().await?;
    Ok(Json(platforms))
}

/// # GET /api/platforms/:id
pub async fn get_platform(
    Path(id): Path<RecordId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Platform>, AppError> {
    let platform = state.store.get_platform_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(platform))
}

/// # POST /api/platforms
pub async fn create_platform(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(input), _): WithRejection<Json<PlatformInput>, AppError>,
) -> Result<(StatusCode, Json<Platform>), AppError> {
    let platform = state.store.create_platform(input).await?;
    Ok((StatusCode::CREATED, Json(platform)))
}

/// # PUT /api/platforms/:id
/// Only the link can change; an `id` in the body is ignored.
pub async fn update_platform(
    Path(id): Path<RecordId>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(input), _): WithRejection<Json<PlatformInput>, AppError>,
) -> Result<Json<Platform>, AppError> {
    let platform = state.store.update_platform(id, input).await?;
    Ok(Json(platform))
}

/// # DELETE /api/platforms/:id
pub async fn delete_platform(
    Path(id): Path<RecordId>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    state.store.delete_platform(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
