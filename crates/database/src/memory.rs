//! A process-local backend with the same semantics as the PostgreSQL one:
//! unique names and links, restrict-on-delete references, and get-or-create
//! resolved under a single write lock so it cannot race.

use crate::store::{AccountStore, OperationStore, PlatformStore};
use crate::DbError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{
    Account, AccountInput, Amount, Operation, OperationInput, Platform, PlatformInput, RecordId,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An operation as stored: lookups are held by id and joined on read, so a
/// renamed account shows up under its new name on every operation.
#[derive(Debug, Clone)]
struct StoredOperation {
    date: NaiveDate,
    deposit_amount: Amount,
    slot_name: Option<String>,
    status: String,
    profit_amount: Amount,
    withdrawal_complete: bool,
    platform_id: RecordId,
    account_id: RecordId,
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: BTreeMap<RecordId, String>,
    platforms: BTreeMap<RecordId, String>,
    operations: BTreeMap<RecordId, StoredOperation>,
    last_account_id: RecordId,
    last_platform_id: RecordId,
    last_operation_id: RecordId,
}

fn conflict(what: &str, key: &str) -> DbError {
    DbError::Conflict(format!("a record with that key already exists ({what} '{key}')"))
}

impl MemoryState {
    fn account_id_by_name(&self, name: &str) -> Option<RecordId> {
        self.accounts.iter().find(|(_, n)| n.as_str() == name).map(|(id, _)| *id)
    }

    fn platform_id_by_link(&self, link: &str) -> Option<RecordId> {
        self.platforms.iter().find(|(_, l)| l.as_str() == link).map(|(id, _)| *id)
    }

    fn insert_account(&mut self, name: String) -> Account {
        self.last_account_id += 1;
        let id = self.last_account_id;
        self.accounts.insert(id, name.clone());
        Account { id, name }
    }

    fn insert_platform(&mut self, link: String) -> Platform {
        self.last_platform_id += 1;
        let id = self.last_platform_id;
        self.platforms.insert(id, link.clone());
        Platform { id, link }
    }

    fn resolve_account(&mut self, name: &str) -> Account {
        match self.account_id_by_name(name) {
            Some(id) => Account { id, name: name.to_string() },
            None => {
                let account = self.insert_account(name.to_string());
                tracing::info!(account_id = account.id, name = %account.name, "Created account on first reference.");
                account
            }
        }
    }

    fn resolve_platform(&mut self, link: &str) -> Platform {
        match self.platform_id_by_link(link) {
            Some(id) => Platform { id, link: link.to_string() },
            None => {
                let platform = self.insert_platform(link.to_string());
                tracing::info!(platform_id = platform.id, link = %platform.link, "Created platform on first reference.");
                platform
            }
        }
    }

    fn is_account_referenced(&self, id: RecordId) -> bool {
        self.operations.values().any(|op| op.account_id == id)
    }

    fn is_platform_referenced(&self, id: RecordId) -> bool {
        self.operations.values().any(|op| op.platform_id == id)
    }

    fn materialize(&self, id: RecordId, op: &StoredOperation) -> Operation {
        Operation {
            id,
            date: op.date,
            deposit_amount: op.deposit_amount,
            slot_name: op.slot_name.clone(),
            status: op.status.clone(),
            profit_amount: op.profit_amount,
            withdrawal_complete: op.withdrawal_complete,
            platform: Platform {
                id: op.platform_id,
                link: self.platforms.get(&op.platform_id).cloned().unwrap_or_default(),
            },
            account: Account {
                id: op.account_id,
                name: self.accounts.get(&op.account_id).cloned().unwrap_or_default(),
            },
        }
    }

    /// Matching operations ordered by date, then id.
    fn select<F>(&self, predicate: F) -> Vec<Operation>
    where
        F: Fn(&StoredOperation) -> bool,
    {
        let mut found: Vec<Operation> = self
            .operations
            .iter()
            .filter(|(_, op)| predicate(op))
            .map(|(id, op)| self.materialize(*id, op))
            .collect();
        found.sort_by_key(|op| (op.date, op.id));
        found
    }

    fn store_operation(&mut self, input: OperationInput) -> StoredOperation {
        let platform = self.resolve_platform(&input.platform.link);
        let account = self.resolve_account(&input.account.name);
        StoredOperation {
            date: input.date,
            deposit_amount: input.deposit_amount,
            slot_name: input.slot_name,
            status: input.status,
            profit_amount: input.profit_amount,
            withdrawal_complete: input.withdrawal_complete,
            platform_id: platform.id,
            account_id: account.id,
        }
    }
}

/// In-memory implementation of every store trait. Cloning shares the data.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryRepository {
    async fn get_all_accounts(&self) -> Result<Vec<Account>, DbError> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .iter()
            .map(|(id, name)| Account { id: *id, name: name.clone() })
            .collect())
    }

    async fn get_account_by_id(&self, id: RecordId) -> Result<Option<Account>, DbError> {
        let state = self.state.read().await;
        Ok(state.accounts.get(&id).map(|name| Account { id, name: name.clone() }))
    }

    async fn create_account(&self, input: AccountInput) -> Result<Account, DbError> {
        let input = input.validated()?;
        let mut state = self.state.write().await;
        if state.account_id_by_name(&input.name).is_some() {
            return Err(conflict("account", &input.name));
        }
        let account = state.insert_account(input.name);
        tracing::info!(account_id = account.id, "Account created.");
        Ok(account)
    }

    async fn update_account(&self, id: RecordId, input: AccountInput) -> Result<Account, DbError> {
        let input = input.validated()?;
        let mut state = self.state.write().await;
        if !state.accounts.contains_key(&id) {
            return Err(DbError::NotFound);
        }
        if state.account_id_by_name(&input.name).is_some_and(|other| other != id) {
            return Err(conflict("account", &input.name));
        }
        state.accounts.insert(id, input.name.clone());
        tracing::info!(account_id = id, "Account updated.");
        Ok(Account { id, name: input.name })
    }

    async fn delete_account(&self, id: RecordId) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        if !state.accounts.contains_key(&id) {
            return Err(DbError::NotFound);
        }
        if state.is_account_referenced(id) {
            return Err(DbError::Conflict(format!(
                "record is still referenced by operations (account {id})"
            )));
        }
        state.accounts.remove(&id);
        tracing::info!(account_id = id, "Account deleted.");
        Ok(())
    }

    async fn find_account_by_name(&self, name: &str) -> Result<Option<Account>, DbError> {
        let state = self.state.read().await;
        Ok(state
            .account_id_by_name(name)
            .map(|id| Account { id, name: name.to_string() }))
    }

    async fn get_or_create_account(&self, name: &str) -> Result<Account, DbError> {
        let input = AccountInput::new(name).validated()?;
        let mut state = self.state.write().await;
        Ok(state.resolve_account(&input.name))
    }
}

#[async_trait]
impl PlatformStore for MemoryRepository {
    async fn get_all_platforms(&self) -> Result<Vec<Platform>, DbError> {
        let state = self.state.read().await;
        Ok(state
            .platforms
            .iter()
            .map(|(id, link)| Platform { id: *id, link: link.clone() })
            .collect())
    }

    async fn get_platform_by_id(&self, id: RecordId) -> Result<Option<Platform>, DbError> {
        let state = self.state.read().await;
        Ok(state.platforms.get(&id).map(|link| Platform { id, link: link.clone() }))
    }

    async fn create_platform(&self, input: PlatformInput) -> Result<Platform, DbError> {
        let input = input.validated()?;
        let mut state = self.state.write().await;
        if state.platform_id_by_link(&input.link).is_some() {
            return Err(conflict("platform", &input.link));
        }
        let platform = state.insert_platform(input.link);
        tracing::info!(platform_id = platform.id, "Platform created.");
        Ok(platform)
    }

    async fn update_platform(&self, id: RecordId, input: PlatformInput) -> Result<Platform, DbError> {
        let input = input.validated()?;
        let mut state = self.state.write().await;
        if !state.platforms.contains_key(&id) {
            return Err(DbError::NotFound);
        }
        if state.platform_id_by_link(&input.link).is_some_and(|other| other != id) {
            return Err(conflict("platform", &input.link));
        }
        state.platforms.insert(id, input.link.clone());
        tracing::info!(platform_id = id, "Platform updated.");
        Ok(Platform { id, link: input.link })
    }

    async fn delete_platform(&self, id: RecordId) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        if !state.platforms.contains_key(&id) {
            return Err(DbError::NotFound);
        }
        if state.is_platform_referenced(id) {
            return Err(DbError::Conflict(format!(
                "record is still referenced by operations (platform {id})"
            )));
        }
        state.platforms.remove(&id);
        tracing::info!(platform_id = id, "Platform deleted.");
        Ok(())
    }

    async fn find_platform_by_link(&self, link: &str) -> Result<Option<Platform>, DbError> {
        let state = self.state.read().await;
        Ok(state
            .platform_id_by_link(link)
            .map(|id| Platform { id, link: link.to_string() }))
    }

    async fn get_or_create_platform(&self, link: &str) -> Result<Platform, DbError> {
        let input = PlatformInput::new(link).validated()?;
        let mut state = self.state.write().await;
        Ok(state.resolve_platform(&input.link))
    }
}

#[async_trait]
impl OperationStore for MemoryRepository {
    async fn get_all_operations(&self) -> Result<Vec<Operation>, DbError> {
        let state = self.state.read().await;
        Ok(state
            .operations
            .iter()
            .map(|(id, op)| state.materialize(*id, op))
            .collect())
    }

    async fn get_operation_by_id(&self, id: RecordId) -> Result<Option<Operation>, DbError> {
        let state = self.state.read().await;
        Ok(state.operations.get(&id).map(|op| state.materialize(id, op)))
    }

    async fn create_operation(&self, input: OperationInput) -> Result<Operation, DbError> {
        let input = input.validated()?;
        let mut state = self.state.write().await;
        let stored = state.store_operation(input);
        state.last_operation_id += 1;
        let id = state.last_operation_id;
        let operation = state.materialize(id, &stored);
        state.operations.insert(id, stored);
        tracing::info!(
            operation_id = id,
            platform_id = operation.platform.id,
            account_id = operation.account.id,
            "Operation created."
        );
        Ok(operation)
    }

    async fn update_operation(&self, id: RecordId, input: OperationInput) -> Result<Operation, DbError> {
        let input = input.validated()?;
        let mut state = self.state.write().await;
        // Checked before resolving so a missed update creates no lookups.
        if !state.operations.contains_key(&id) {
            return Err(DbError::NotFound);
        }
        let stored = state.store_operation(input);
        let operation = state.materialize(id, &stored);
        state.operations.insert(id, stored);
        tracing::info!(operation_id = id, "Operation updated.");
        Ok(operation)
    }

    async fn delete_operation(&self, id: RecordId) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        if state.operations.remove(&id).is_none() {
            return Err(DbError::NotFound);
        }
        tracing::info!(operation_id = id, "Operation deleted.");
        Ok(())
    }

    async fn find_operations_by_date(&self, date: NaiveDate) -> Result<Vec<Operation>, DbError> {
        let state = self.state.read().await;
        Ok(state.select(|op| op.date == date))
    }

    async fn find_operations_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Operation>, DbError> {
        let state = self.state.read().await;
        Ok(state.select(|op| op.date >= start && op.date <= end))
    }

    async fn find_operations_by_platform_link(&self, link: &str) -> Result<Vec<Operation>, DbError> {
        let state = self.state.read().await;
        let Some(platform_id) = state.platform_id_by_link(link) else {
            return Ok(Vec::new());
        };
        Ok(state.select(|op| op.platform_id == platform_id))
    }

    async fn find_operations_by_account_name(&self, name: &str) -> Result<Vec<Operation>, DbError> {
        let state = self.state.read().await;
        let Some(account_id) = state.account_id_by_name(name) else {
            return Ok(Vec::new());
        };
        Ok(state.select(|op| op.account_id == account_id))
    }

    async fn find_operations_by_status(&self, status: &str) -> Result<Vec<Operation>, DbError> {
        let state = self.state.read().await;
        Ok(state.select(|op| op.status == status))
    }

    async fn find_operations_by_withdrawal_complete(
        &self,
        withdrawal_complete: bool,
    ) -> Result<Vec<Operation>, DbError> {
        let state = self.state.read().await;
        Ok(state.select(|op| op.withdrawal_complete == withdrawal_complete))
    }
}
