//! Request handlers, one module per resource.
//!
//! Every handler takes `State<Arc<AppState>>` and returns `Result<_, AppError>`;
//! JSON bodies go through `WithRejection` so a malformed body becomes a 400
//! with the same error shape as a failed validation.

pub mod accounts;
pub mod aggregates;
pub mod operations;
pub mod platforms;

/// # GET /api/health
pub async fn health() -> &'static str {
    "OK"
}
