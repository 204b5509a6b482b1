use crate::{error::AppError, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use core_types::{Account, AccountInput, RecordId};
use std::sync::Arc;

/// # GET /api/accounts
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = state.store.get_all_accounts().await?;
    Ok(Json(accounts))
}

/// # GET /api/accounts/:id
pub async fn get_account(
    Path(id): Path<RecordId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Account>, AppError> {
    let account = state.store.get_account_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(account))
}

/// # POST /api/accounts
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(input), _): WithRejection<Json<AccountInput>, AppError>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = state.store.create_account(input).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// # PUT /api/accounts/:id
/// Only the name can change; an `id` in the body is ignored.
pub async fn update_account(
    Path(id): Path<RecordId>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(input), _): WithRejection<Json<AccountInput>, AppError>,
) -> Result<Json<Account>, AppError> {
    let account = state.store.update_account(id, input).await?;
    Ok(Json(account))
}

/// # DELETE /api/accounts/:id
pub async fn delete_account(
    Path(id): Path<RecordId>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    state.store.delete_account(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
