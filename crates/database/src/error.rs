use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    Sqlx(#[source] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid record: {0}")]
    Validation(#[from] CoreError),

    #[error("Conflicting record: {0}")]
    Conflict(String),

    #[error("The requested data was not found in the database.")]
    NotFound,
}

/// Classifies driver errors so constraint violations surface as conflicts
/// instead of opaque query failures.
impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = e {
            return DbError::NotFound;
        }
        if let Some(db_err) = e.as_database_error() {
            let constraint = db_err.constraint().unwrap_or("unknown constraint");
            if db_err.is_unique_violation() {
                return DbError::Conflict(format!("a record with that key already exists ({constraint})"));
            }
            if db_err.is_foreign_key_violation() {
                return DbError::Conflict(format!(
                    "record is still referenced by operations ({constraint})"
                ));
            }
        }
        DbError::Sqlx(e)
    }
}
