use crate::{error::AppError, handlers::operations::Period, AppState};
use analytics::ProfitSummary;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use core_types::Amount;
use std::collections::BTreeMap;
use std::sync::Arc;

// --- Per date ---

/// # GET /api/operations/daily-profit/:date
pub async fn daily_profit(
    Path(date): Path<NaiveDate>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Amount>, AppError> {
    Ok(Json(state.ledger.total_profit(date).await?))
}

/// # GET /api/operations/daily-deposit/:date
pub async fn daily_deposit(
    Path(date): Path<NaiveDate>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Amount>, AppError> {
    Ok(Json(state.ledger.total_deposit(date).await?))
}

/// # GET /api/operations/daily-net-profit/:date
pub async fn daily_net_profit(
    Path(date): Path<NaiveDate>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Amount>, AppError> {
    Ok(Json(state.ledger.net_profit(date).await?))
}

/// # GET /api/operations/daily-summary/:date
pub async fn daily_summary(
    Path(date): Path<NaiveDate>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProfitSummary>, AppError> {
    Ok(Json(state.ledger.daily_summary(date).await?))
}

/// # GET /api/operations/period-summary?startDate=..&endDate=..
pub async fn period_summary(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(period), _): WithRejection<Query<Period>, AppError>,
) -> Result<Json<ProfitSummary>, AppError> {
    let summary = state
        .ledger
        .period_summary(period.start_date, period.end_date)
        .await?;
    Ok(Json(summary))
}

// --- Whole store ---

/// # GET /api/operations/total-profit
pub async fn total_profit(State(state): State<Arc<AppState>>) -> Result<Json<Amount>, AppError> {
    Ok(Json(state.ledger.total_profit_overall().await?))
}

/// # GET /api/operations/total-deposit
pub async fn total_deposit(State(state): State<Arc<AppState>>) -> Result<Json<Amount>, AppError> {
    Ok(Json(state.ledger.total_deposit_overall().await?))
}

/// # GET /api/operations/net-profit
pub async fn net_profit(State(state): State<Arc<AppState>>) -> Result<Json<Amount>, AppError> {
    Ok(Json(state.ledger.net_profit_overall().await?))
}

// --- Per platform / account ---

/// # GET /api/operations/profit-by-platform/:link
pub async fn profit_for_platform(
    Path(link): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Amount>, AppError> {
    Ok(Json(state.ledger.total_profit_by_platform(&link).await?))
}

/// # GET /api/operations/profit-by-account/:name
pub async fn profit_for_account(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Amount>, AppError> {
    Ok(Json(state.ledger.total_profit_by_account(&name).await?))
}

/// # GET /api/operations/net-profit-by-platform/:link
pub async fn net_profit_for_platform(
    Path(link): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Amount>, AppError> {
    Ok(Json(state.ledger.net_profit_by_platform(&link).await?))
}

/// # GET /api/operations/net-profit-by-account/:name
pub async fn net_profit_for_account(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Amount>, AppError> {
    Ok(Json(state.ledger.net_profit_by_account(&name).await?))
}

// --- Group-bys ---

/// # GET /api/operations/profit-by-day
/// Keys are ISO dates in ascending order; dates without operations are absent.
pub async fn profit_by_day(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<NaiveDate, Amount>>, AppError> {
    Ok(Json(state.ledger.profit_by_day().await?))
}

/// # GET /api/operations/profit-by-platform
pub async fn profit_by_platform(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Amount>>, AppError> {
    Ok(Json(state.ledger.profit_by_platform().await?))
}

/// # GET /api/operations/profit-by-account
pub async fn profit_by_account(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Amount>>, AppError> {
    Ok(Json(state.ledger.profit_by_account().await?))
}
