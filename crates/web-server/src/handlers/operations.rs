use crate::{error::AppError, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use core_types::{Operation, OperationInput, RecordId};
use serde::Deserialize;
use std::sync::Arc;

/// Inclusive date range, e.g. `?startDate=2024-01-01&endDate=2024-01-31`.
#[derive(Debug, Deserialize)]
pub struct Period {
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
}

/// # GET /api/operations
pub async fn list_operations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Operation>>, AppError> {
    let operations = state.store.get_all_operations().await?;
    Ok(Json(operations))
}

/// # GET /api/operations/:id
pub async fn get_operation(
    Path(id): Path<RecordId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Operation>, AppError> {
    let operation = state.store.get_operation_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(operation))
}

/// # POST /api/operations
/// The platform and account are resolved by link and name, and created if new.
pub async fn create_operation(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(input), _): WithRejection<Json<OperationInput>, AppError>,
) -> Result<(StatusCode, Json<Operation>), AppError> {
    let operation = state.store.create_operation(input).await?;
    Ok((StatusCode::CREATED, Json(operation)))
}

/// # PUT /api/operations/:id
pub async fn update_operation(
    Path(id): Path<RecordId>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(input), _): WithRejection<Json<OperationInput>, AppError>,
) -> Result<Json<Operation>, AppError> {
    let operation = state.store.update_operation(id, input).await?;
    Ok(Json(operation))
}

/// # DELETE /api/operations/:id
pub async fn delete_operation(
    Path(id): Path<RecordId>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    state.store.delete_operation(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// # GET /api/operations/date/:date
pub async fn operations_by_date(
    Path(date): Path<NaiveDate>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Operation>>, AppError> {
    let operations = state.store.find_operations_by_date(date).await?;
    Ok(Json(operations))
}

/// # GET /api/operations/period?startDate=..&endDate=..
pub async fn operations_by_period(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(period), _): WithRejection<Query<Period>, AppError>,
) -> Result<Json<Vec<Operation>>, AppError> {
    analytics::check_period(period.start_date, period.end_date)?;
    let operations = state
        .store
        .find_operations_by_date_range(period.start_date, period.end_date)
        .await?;
    Ok(Json(operations))
}

/// # GET /api/operations/platform/:link
pub async fn operations_by_platform(
    Path(link): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Operation>>, AppError> {
    let operations = state.store.find_operations_by_platform_link(&link).await?;
    Ok(Json(operations))
}

/// # GET /api/operations/account/:name
pub async fn operations_by_account(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Operation>>, AppError> {
    let operations = state.store.find_operations_by_account_name(&name).await?;
    Ok(Json(operations))
}

/// # GET /api/operations/status/:status
pub async fn operations_by_status(
    Path(status): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Operation>>, AppError> {
    let operations = state.store.find_operations_by_status(&status).await?;
    Ok(Json(operations))
}

/// # GET /api/operations/withdrawal-complete/:flag
pub async fn operations_by_withdrawal_complete(
    Path(flag): Path<bool>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Operation>>, AppError> {
    let operations = state.store.find_operations_by_withdrawal_complete(flag).await?;
    Ok(Json(operations))
}
