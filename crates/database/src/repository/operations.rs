use super::accounts::upsert_account;
use super::platforms::upsert_platform;
use super::DbRepository;
use crate::store::OperationStore;
use crate::DbError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{Account, Amount, Operation, OperationInput, Platform, RecordId};
use sqlx::FromRow;

/// Shared projection joining each operation with its platform and account.
const SELECT_OPERATIONS: &str = r#"
    SELECT
        o.id, o.operation_date, o.deposit_amount, o.slot_name, o.status,
        o.profit_amount, o.withdrawal_complete,
        p.id AS platform_id, p.link AS platform_link,
        a.id AS account_id, a.name AS account_name
    FROM operations AS o
    JOIN platforms AS p ON p.id = o.platform_id
    JOIN accounts AS a ON a.id = o.account_id
"#;

/// Database-specific operation struct that matches the joined projection.
#[derive(Debug, Clone, FromRow)]
struct DbOperation {
    id: RecordId,
    operation_date: NaiveDate,
    deposit_amount: Amount,
    slot_name: Option<String>,
    status: String,
    profit_amount: Amount,
    withdrawal_complete: bool,
    platform_id: RecordId,
    platform_link: String,
    account_id: RecordId,
    account_name: String,
}

impl From<DbOperation> for Operation {
    fn from(row: DbOperation) -> Self {
        Operation {
            id: row.id,
            date: row.operation_date,
            deposit_amount: row.deposit_amount,
            slot_name: row.slot_name,
            status: row.status,
            profit_amount: row.profit_amount,
            withdrawal_complete: row.withdrawal_complete,
            platform: Platform { id: row.platform_id, link: row.platform_link },
            account: Account { id: row.account_id, name: row.account_name },
        }
    }
}

fn into_operations(rows: Vec<DbOperation>) -> Vec<Operation> {
    rows.into_iter().map(Operation::from).collect()
}

fn build_operation(id: RecordId, input: OperationInput, platform: Platform, account: Account) -> Operation {
    Operation {
        id,
        date: input.date,
        deposit_amount: input.deposit_amount,
        slot_name: input.slot_name,
        status: input.status,
        profit_amount: input.profit_amount,
        withdrawal_complete: input.withdrawal_complete,
        platform,
        account,
    }
}

#[async_trait]
impl OperationStore for DbRepository {
    async fn get_all_operations(&self) -> Result<Vec<Operation>, DbError> {
        let rows = sqlx::query_as::<_, DbOperation>(&format!("{SELECT_OPERATIONS} ORDER BY o.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(into_operations(rows))
    }

    async fn get_operation_by_id(&self, id: RecordId) -> Result<Option<Operation>, DbError> {
        let row = sqlx::query_as::<_, DbOperation>(&format!("{SELECT_OPERATIONS} WHERE o.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Operation::from))
    }

    /// Resolves the platform and account and inserts the operation in one
    /// transaction, so a failed insert leaves no orphaned lookup rows behind.
    async fn create_operation(&self, input: OperationInput) -> Result<Operation, DbError> {
        let input = input.validated()?;
        let mut tx = self.pool.begin().await?;

        let platform = upsert_platform(&mut *tx, &input.platform.link).await?;
        let account = upsert_account(&mut *tx, &input.account.name).await?;

        let id: RecordId = sqlx::query_scalar(
            r#"
            INSERT INTO operations (
                operation_date, deposit_amount, slot_name, status,
                profit_amount, withdrawal_complete, platform_id, account_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(input.date)
        .bind(input.deposit_amount)
        .bind(input.slot_name.as_deref())
        .bind(&input.status)
        .bind(input.profit_amount)
        .bind(input.withdrawal_complete)
        .bind(platform.id)
        .bind(account.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(
            operation_id = id,
            platform_id = platform.id,
            account_id = account.id,
            "Operation created."
        );
        Ok(build_operation(id, input, platform, account))
    }

    async fn update_operation(&self, id: RecordId, input: OperationInput) -> Result<Operation, DbError> {
        let input = input.validated()?;
        let mut tx = self.pool.begin().await?;

        let platform = upsert_platform(&mut *tx, &input.platform.link).await?;
        let account = upsert_account(&mut *tx, &input.account.name).await?;

        let updated: Option<RecordId> = sqlx::query_scalar(
            r#"
            UPDATE operations SET
                operation_date = $1, deposit_amount = $2, slot_name = $3, status = $4,
                profit_amount = $5, withdrawal_complete = $6, platform_id = $7, account_id = $8
            WHERE id = $9
            RETURNING id
            "#,
        )
        .bind(input.date)
        .bind(input.deposit_amount)
        .bind(input.slot_name.as_deref())
        .bind(&input.status)
        .bind(input.profit_amount)
        .bind(input.withdrawal_complete)
        .bind(platform.id)
        .bind(account.id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        // Lookup rows created above must not outlive a missed update.
        let Some(id) = updated else {
            tx.rollback().await?;
            return Err(DbError::NotFound);
        };

        tx.commit().await?;
        tracing::info!(operation_id = id, "Operation updated.");
        Ok(build_operation(id, input, platform, account))
    }

    async fn delete_operation(&self, id: RecordId) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM operations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        tracing::info!(operation_id = id, "Operation deleted.");
        Ok(())
    }

    async fn find_operations_by_date(&self, date: NaiveDate) -> Result<Vec<Operation>, DbError> {
        let rows = sqlx::query_as::<_, DbOperation>(&format!(
            "{SELECT_OPERATIONS} WHERE o.operation_date = $1 ORDER BY o.id"
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(into_operations(rows))
    }

    async fn find_operations_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Operation>, DbError> {
        let rows = sqlx::query_as::<_, DbOperation>(&format!(
            "{SELECT_OPERATIONS} WHERE o.operation_date BETWEEN $1 AND $2 ORDER BY o.operation_date, o.id"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(into_operations(rows))
    }

    async fn find_operations_by_platform_link(&self, link: &str) -> Result<Vec<Operation>, DbError> {
        let rows = sqlx::query_as::<_, DbOperation>(&format!(
            "{SELECT_OPERATIONS} WHERE p.link = $1 ORDER BY o.operation_date, o.id"
        ))
        .bind(link)
        .fetch_all(&self.pool)
        .await?;
        Ok(into_operations(rows))
    }

    async fn find_operations_by_account_name(&self, name: &str) -> Result<Vec<Operation>, DbError> {
        let rows = sqlx::query_as::<_, DbOperation>(&format!(
            "{SELECT_OPERATIONS} WHERE a.name = $1 ORDER BY o.operation_date, o.id"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        Ok(into_operations(rows))
    }

    async fn find_operations_by_status(&self, status: &str) -> Result<Vec<Operation>, DbError> {
        let rows = sqlx::query_as::<_, DbOperation>(&format!(
            "{SELECT_OPERATIONS} WHERE o.status = $1 ORDER BY o.operation_date, o.id"
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(into_operations(rows))
    }

    async fn find_operations_by_withdrawal_complete(
        &self,
        withdrawal_complete: bool,
    ) -> Result<Vec<Operation>, DbError> {
        let rows = sqlx::query_as::<_, DbOperation>(&format!(
            "{SELECT_OPERATIONS} WHERE o.withdrawal_complete = $1 ORDER BY o.operation_date, o.id"
        ))
        .bind(withdrawal_complete)
        .fetch_all(&self.pool)
        .await?;
        Ok(into_operations(rows))
    }
}
