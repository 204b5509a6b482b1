use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Failed to read operations: {0}")]
    Database(#[from] database::DbError),

    #[error("Invalid period: start {start} is after end {end}")]
    InvalidPeriod { start: String, end: String },
}
