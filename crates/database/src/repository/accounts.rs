use super::DbRepository;
use crate::store::AccountStore;
use crate::DbError;
use async_trait::async_trait;
use core_types::{Account, AccountInput, RecordId};
use sqlx::{FromRow, PgConnection};

#[derive(Debug, FromRow)]
struct UpsertedAccount {
    id: RecordId,
    name: String,
    inserted: bool,
}

/// Insert-or-return on the unique name. The no-op `DO UPDATE` makes
/// `RETURNING` yield the existing row; `xmax = 0` only holds for a fresh insert.
pub(super) async fn upsert_account(
    conn: &mut PgConnection,
    name: &str,
) -> Result<Account, DbError> {
    let row = sqlx::query_as::<_, UpsertedAccount>(
        r#"
        INSERT INTO accounts (name) VALUES ($1)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id, name, (xmax = 0) AS inserted
        "#,
    )
    .bind(name)
    .fetch_one(conn)
    .await?;

    if row.inserted {
        tracing::info!(account_id = row.id, name = %row.name, "Created account on first reference.");
    }
    Ok(Account { id: row.id, name: row.name })
}

#[async_trait]
impl AccountStore for DbRepository {
    async fn get_all_accounts(&self) -> Result<Vec<Account>, DbError> {
        let rows = sqlx::query_as::<_, (RecordId, String)>("SELECT id, name FROM accounts ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(id, name)| Account { id, name }).collect())
    }

    async fn get_account_by_id(&self, id: RecordId) -> Result<Option<Account>, DbError> {
        let row = sqlx::query_as::<_, (RecordId, String)>("SELECT id, name FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id, name)| Account { id, name }))
    }

    async fn create_account(&self, input: AccountInput) -> Result<Account, DbError> {
        let input = input.validated()?;
        let (id, name) = sqlx::query_as::<_, (RecordId, String)>(
            "INSERT INTO accounts (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&input.name)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(account_id = id, "Account created.");
        Ok(Account { id, name })
    }

    async fn update_account(&self, id: RecordId, input: AccountInput) -> Result<Account, DbError> {
        let input = input.validated()?;
        let row = sqlx::query_as::<_, (RecordId, String)>(
            "UPDATE accounts SET name = $1 WHERE id = $2 RETURNING id, name",
        )
        .bind(&input.name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let (id, name) = row.ok_or(DbError::NotFound)?;
        tracing::info!(account_id = id, "Account updated.");
        Ok(Account { id, name })
    }

    async fn delete_account(&self, id: RecordId) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        tracing::info!(account_id = id, "Account deleted.");
        Ok(())
    }

    async fn find_account_by_name(&self, name: &str) -> Result<Option<Account>, DbError> {
        let row = sqlx::query_as::<_, (RecordId, String)>("SELECT id, name FROM accounts WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id, name)| Account { id, name }))
    }

    async fn get_or_create_account(&self, name: &str) -> Result<Account, DbError> {
        let input = AccountInput::new(name).validated()?;
        let mut conn = self.pool.acquire().await?;
        upsert_account(&mut *conn, &input.name).await
    }
}
