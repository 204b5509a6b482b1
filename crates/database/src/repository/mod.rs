use sqlx::postgres::PgPool;

mod accounts;
mod operations;
mod platforms;

/// The `DbRepository` provides the PostgreSQL implementation of every store
/// trait. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
