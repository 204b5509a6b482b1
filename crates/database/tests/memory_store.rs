use core_types::{AccountInput, Amount, PlatformInput};
use database::{AccountStore, DbError, MemoryRepository, OperationStore, PlatformStore};

mod common;
use common::{date, operation};

#[tokio::test]
async fn get_or_create_account_is_idempotent() {
    let repo = MemoryRepository::new();

    let first = repo.get_or_create_account("alice").await.expect("First call");
    let second = repo.get_or_create_account("alice").await.expect("Second call");

    assert_eq!(first.id, second.id);
    let accounts = repo.get_all_accounts().await.expect("List accounts");
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].name, "alice");
}

#[tokio::test]
async fn get_or_create_platform_trims_and_reuses() {
    let repo = MemoryRepository::new();

    let created = repo.get_or_create_platform(" siteA ").await.expect("Create");
    let reused = repo.get_or_create_platform("siteA").await.expect("Reuse");

    assert_eq!(created.id, reused.id);
    assert_eq!(reused.link, "siteA");
    assert_eq!(repo.get_all_platforms().await.expect("List").len(), 1);
}

#[tokio::test]
async fn concurrent_get_or_create_yields_one_record() {
    let repo = MemoryRepository::new();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.get_or_create_account("racer").await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.expect("Join task").expect("Get or create").id);
    }

    ids.dedup();
    assert_eq!(ids.len(), 1);
    assert_eq!(repo.get_all_accounts().await.expect("List").len(), 1);
}

#[tokio::test]
async fn missing_lookups_are_empty_not_errors() {
    let repo = MemoryRepository::new();

    assert!(repo.get_account_by_id(999).await.expect("Lookup").is_none());
    assert!(repo.find_account_by_name("nobody").await.expect("Lookup").is_none());
    assert!(repo.get_platform_by_id(999).await.expect("Lookup").is_none());
    assert!(repo.find_platform_by_link("nowhere").await.expect("Lookup").is_none());
    assert!(repo.get_operation_by_id(999).await.expect("Lookup").is_none());
}

#[tokio::test]
async fn writes_to_missing_ids_report_not_found() {
    let repo = MemoryRepository::new();

    assert!(matches!(
        repo.update_account(42, AccountInput::new("x")).await,
        Err(DbError::NotFound)
    ));
    assert!(matches!(repo.delete_account(42).await, Err(DbError::NotFound)));
    assert!(matches!(
        repo.update_platform(42, PlatformInput::new("x")).await,
        Err(DbError::NotFound)
    ));
    assert!(matches!(repo.delete_platform(42).await, Err(DbError::NotFound)));
    assert!(matches!(repo.delete_operation(42).await, Err(DbError::NotFound)));
}

#[tokio::test]
async fn update_of_missing_operation_creates_no_lookups() {
    let repo = MemoryRepository::new();

    let result = repo
        .update_operation(7, operation("ghost", "ghost-site", date(2024, 1, 10), 0, 0))
        .await;

    assert!(matches!(result, Err(DbError::NotFound)));
    assert!(repo.get_all_accounts().await.expect("List").is_empty());
    assert!(repo.get_all_platforms().await.expect("List").is_empty());
}

#[tokio::test]
async fn explicit_create_with_existing_key_conflicts() {
    let repo = MemoryRepository::new();
    repo.create_account(AccountInput::new("alice")).await.expect("Create");

    let duplicate = repo.create_account(AccountInput::new("alice")).await;
    assert!(matches!(duplicate, Err(DbError::Conflict(_))));

    let bob = repo.create_account(AccountInput::new("bob")).await.expect("Create bob");
    let rename = repo.update_account(bob.id, AccountInput::new("alice")).await;
    assert!(matches!(rename, Err(DbError::Conflict(_))));

    // Renaming to its own name is not a conflict.
    let same = repo.update_account(bob.id, AccountInput::new("bob")).await.expect("Rename");
    assert_eq!(same.id, bob.id);
}

#[tokio::test]
async fn blank_names_are_rejected() {
    let repo = MemoryRepository::new();

    assert!(matches!(
        repo.create_account(AccountInput::new("  ")).await,
        Err(DbError::Validation(_))
    ));
    assert!(matches!(repo.get_or_create_platform("").await, Err(DbError::Validation(_))));
}

#[tokio::test]
async fn create_operation_resolves_lookups_by_natural_key() {
    let repo = MemoryRepository::new();

    let created = repo
        .create_operation(operation("alice", "siteA", date(2024, 1, 10), 10_000, 15_000))
        .await
        .expect("Create operation");

    assert_eq!(created.account.name, "alice");
    assert_eq!(created.platform.link, "siteA");
    assert_eq!(created.deposit_amount.to_string(), "100.00");

    let accounts = repo.get_all_accounts().await.expect("List accounts");
    let platforms = repo.get_all_platforms().await.expect("List platforms");
    assert_eq!(accounts.len(), 1);
    assert_eq!(platforms.len(), 1);
    assert_eq!(accounts[0].id, created.account.id);
    assert_eq!(platforms[0].id, created.platform.id);

    let fetched = repo
        .get_operation_by_id(created.id)
        .await
        .expect("Get operation")
        .expect("Operation should exist");
    assert_eq!(fetched.profit_amount, Amount::from_cents(15_000));
}

#[tokio::test]
async fn update_with_same_lookups_creates_no_duplicates() {
    let repo = MemoryRepository::new();
    let created = repo
        .create_operation(operation("alice", "siteA", date(2024, 1, 10), 10_000, 15_000))
        .await
        .expect("Create operation");

    let mut changed = operation("alice", "siteA", date(2024, 1, 11), 5_000, 2_000);
    changed.withdrawal_complete = true;
    let updated = repo.update_operation(created.id, changed).await.expect("Update");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.account.id, created.account.id);
    assert_eq!(updated.platform.id, created.platform.id);
    assert!(updated.withdrawal_complete);
    assert_eq!(repo.get_all_accounts().await.expect("List").len(), 1);
    assert_eq!(repo.get_all_platforms().await.expect("List").len(), 1);
}

#[tokio::test]
async fn update_can_repoint_to_new_lookups() {
    let repo = MemoryRepository::new();
    let created = repo
        .create_operation(operation("alice", "siteA", date(2024, 1, 10), 100, 100))
        .await
        .expect("Create operation");

    let updated = repo
        .update_operation(created.id, operation("bob", "siteB", date(2024, 1, 10), 100, 100))
        .await
        .expect("Update");

    assert_eq!(updated.account.name, "bob");
    assert_ne!(updated.account.id, created.account.id);
    assert_eq!(repo.get_all_accounts().await.expect("List").len(), 2);
}

#[tokio::test]
async fn referenced_lookups_cannot_be_deleted() {
    let repo = MemoryRepository::new();
    let created = repo
        .create_operation(operation("alice", "siteA", date(2024, 1, 10), 100, 100))
        .await
        .expect("Create operation");

    assert!(matches!(
        repo.delete_account(created.account.id).await,
        Err(DbError::Conflict(_))
    ));
    assert!(matches!(
        repo.delete_platform(created.platform.id).await,
        Err(DbError::Conflict(_))
    ));

    repo.delete_operation(created.id).await.expect("Delete operation");
    repo.delete_account(created.account.id).await.expect("Delete account");
    repo.delete_platform(created.platform.id).await.expect("Delete platform");
    assert!(repo.get_all_accounts().await.expect("List").is_empty());
}

#[tokio::test]
async fn renamed_account_is_visible_on_its_operations() {
    let repo = MemoryRepository::new();
    let created = repo
        .create_operation(operation("alice", "siteA", date(2024, 1, 10), 100, 100))
        .await
        .expect("Create operation");

    repo.update_account(created.account.id, AccountInput::new("alice2"))
        .await
        .expect("Rename");

    let by_new_name = repo.find_operations_by_account_name("alice2").await.expect("Filter");
    assert_eq!(by_new_name.len(), 1);
    assert!(repo.find_operations_by_account_name("alice").await.expect("Filter").is_empty());
}

#[tokio::test]
async fn filtered_reads_match_exactly() {
    let repo = MemoryRepository::new();
    let mut a = operation("alice", "siteA", date(2024, 1, 10), 100, 1_000);
    a.status = "GREEN".to_string();
    let mut b = operation("bob", "siteB", date(2024, 1, 12), 200, 2_000);
    b.status = "RED".to_string();
    b.withdrawal_complete = true;
    let c = operation("alice", "siteB", date(2024, 1, 15), 300, 3_000);

    let a = repo.create_operation(a).await.expect("Create a");
    let b = repo.create_operation(b).await.expect("Create b");
    let c = repo.create_operation(c).await.expect("Create c");

    let on_day = repo.find_operations_by_date(date(2024, 1, 12)).await.expect("By date");
    assert_eq!(on_day.iter().map(|op| op.id).collect::<Vec<_>>(), vec![b.id]);

    // Both range bounds are inclusive.
    let range = repo
        .find_operations_by_date_range(date(2024, 1, 10), date(2024, 1, 12))
        .await
        .expect("By range");
    assert_eq!(range.iter().map(|op| op.id).collect::<Vec<_>>(), vec![a.id, b.id]);

    let on_site_b = repo.find_operations_by_platform_link("siteB").await.expect("By platform");
    assert_eq!(on_site_b.iter().map(|op| op.id).collect::<Vec<_>>(), vec![b.id, c.id]);

    let for_alice = repo.find_operations_by_account_name("alice").await.expect("By account");
    assert_eq!(for_alice.iter().map(|op| op.id).collect::<Vec<_>>(), vec![a.id, c.id]);

    let red = repo.find_operations_by_status("RED").await.expect("By status");
    assert_eq!(red.iter().map(|op| op.id).collect::<Vec<_>>(), vec![b.id]);
    assert!(repo.find_operations_by_status("red").await.expect("By status").is_empty());

    let withdrawn = repo.find_operations_by_withdrawal_complete(true).await.expect("By flag");
    assert_eq!(withdrawn.iter().map(|op| op.id).collect::<Vec<_>>(), vec![b.id]);
    let pending = repo.find_operations_by_withdrawal_complete(false).await.expect("By flag");
    assert_eq!(pending.len(), 2);

    assert!(repo.find_operations_by_platform_link("unknown").await.expect("By platform").is_empty());
}
