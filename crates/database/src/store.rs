//! Storage contracts shared by the PostgreSQL and in-memory backends.
//!
//! Lookups (`get_*_by_id`, `find_*`) return `Ok(None)` for a missing key;
//! writes that target a missing id return [`DbError::NotFound`] and leave the
//! store untouched.

use crate::DbError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{Account, AccountInput, Operation, OperationInput, Platform, PlatformInput, RecordId};

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// All accounts, ordered by id.
    async fn get_all_accounts(&self) -> Result<Vec<Account>, DbError>;

    async fn get_account_by_id(&self, id: RecordId) -> Result<Option<Account>, DbError>;

    /// Inserts a new account. An existing name is a [`DbError::Conflict`].
    async fn create_account(&self, input: AccountInput) -> Result<Account, DbError>;

    /// Renames an account.
    async fn update_account(&self, id: RecordId, input: AccountInput) -> Result<Account, DbError>;

    /// Fails with [`DbError::Conflict`] while operations still reference the account.
    async fn delete_account(&self, id: RecordId) -> Result<(), DbError>;

    async fn find_account_by_name(&self, name: &str) -> Result<Option<Account>, DbError>;

    /// Returns the account with this name, inserting it first if needed.
    ///
    /// Atomic: concurrent callers with the same new name all receive the
    /// same record.
    async fn get_or_create_account(&self, name: &str) -> Result<Account, DbError>;
}

/// Same contract as [`AccountStore`], keyed on the platform link.
#[async_trait]
pub trait PlatformStore: Send + Sync {
    async fn get_all_platforms(&self) -> Result<Vec<Platform>, DbError>;

    async fn get_platform_by_id(&self, id: RecordId) -> Result<Option<Platform>, DbError>;

    async fn create_platform(&self, input: PlatformInput) -> Result<Platform, DbError>;

    async fn update_platform(&self, id: RecordId, input: PlatformInput) -> Result<Platform, DbError>;

    async fn delete_platform(&self, id: RecordId) -> Result<(), DbError>;

    async fn find_platform_by_link(&self, link: &str) -> Result<Option<Platform>, DbError>;

    async fn get_or_create_platform(&self, link: &str) -> Result<Platform, DbError>;
}

/// Operation records. Writes resolve the referenced platform and account by
/// natural key, creating them when they do not exist yet.
#[async_trait]
pub trait OperationStore: Send + Sync {
    /// All operations, ordered by id.
    async fn get_all_operations(&self) -> Result<Vec<Operation>, DbError>;

    async fn get_operation_by_id(&self, id: RecordId) -> Result<Option<Operation>, DbError>;

    async fn create_operation(&self, input: OperationInput) -> Result<Operation, DbError>;

    /// Replaces every field, including the platform and account references.
    async fn update_operation(&self, id: RecordId, input: OperationInput) -> Result<Operation, DbError>;

    async fn delete_operation(&self, id: RecordId) -> Result<(), DbError>;

    async fn find_operations_by_date(&self, date: NaiveDate) -> Result<Vec<Operation>, DbError>;

    /// Both bounds are inclusive.
    async fn find_operations_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Operation>, DbError>;

    async fn find_operations_by_platform_link(&self, link: &str) -> Result<Vec<Operation>, DbError>;

    async fn find_operations_by_account_name(&self, name: &str) -> Result<Vec<Operation>, DbError>;

    async fn find_operations_by_status(&self, status: &str) -> Result<Vec<Operation>, DbError>;

    async fn find_operations_by_withdrawal_complete(
        &self,
        withdrawal_complete: bool,
    ) -> Result<Vec<Operation>, DbError>;
}

/// Everything the API needs from a backend, usable as one trait object.
pub trait LedgerStore: AccountStore + PlatformStore + OperationStore {}

impl<T> LedgerStore for T where T: AccountStore + PlatformStore + OperationStore {}
