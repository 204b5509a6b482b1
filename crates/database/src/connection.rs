use crate::error::DbError;
use crate::memory::MemoryRepository;
use crate::repository::DbRepository;
use crate::store::LedgerStore;
use configuration::{DatabaseSettings, StorageBackend};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::sync::Arc;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The URL comes from `settings.url`, or from `DATABASE_URL` (a `.env` file
/// is loaded first if present). The pool can be shared across the entire
/// application.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    dotenvy::dotenv().ok();

    let database_url = match settings.url.clone() {
        Some(url) => url,
        None => env::var("DATABASE_URL").map_err(|_e| {
            DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string())
        })?,
    };

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout())
        .connect(&database_url)
        .await?;

    tracing::info!(max_connections = settings.max_connections, "Database pool ready.");
    Ok(pool)
}

/// Applies any pending migrations from `./migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied.");
    Ok(())
}

/// Builds the store selected by `backend`.
///
/// For PostgreSQL this connects the pool and, when `settings.run_migrations`
/// is set, brings the schema up to date first.
pub async fn open_store(
    backend: StorageBackend,
    settings: &DatabaseSettings,
) -> Result<Arc<dyn LedgerStore>, DbError> {
    match backend {
        StorageBackend::Postgres => {
            let pool = connect(settings).await?;
            if settings.run_migrations {
                run_migrations(&pool).await?;
            }
            Ok(Arc::new(DbRepository::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; records are lost on exit.");
            Ok(Arc::new(MemoryRepository::new()))
        }
    }
}
