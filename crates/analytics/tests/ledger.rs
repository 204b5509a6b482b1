use analytics::{AnalyticsError, Ledger, ProfitSummary};
use chrono::NaiveDate;
use core_types::{AccountInput, Amount, OperationInput, PlatformInput};
use database::{MemoryRepository, OperationStore};
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn operation(account: &str, platform: &str, on: NaiveDate, deposit: i64, profit: i64) -> OperationInput {
    OperationInput {
        date: on,
        deposit_amount: Amount::from_cents(deposit),
        slot_name: Some("Fortune Tiger".to_string()),
        status: "GREEN".to_string(),
        profit_amount: Amount::from_cents(profit),
        withdrawal_complete: false,
        platform: PlatformInput::new(platform),
        account: AccountInput::new(account),
    }
}

async fn seeded() -> (Arc<MemoryRepository>, Ledger<MemoryRepository>) {
    let repo = Arc::new(MemoryRepository::new());
    for input in [
        operation("alice", "siteA", date(2024, 1, 10), 10_000, 15_000),
        operation("bob", "siteA", date(2024, 1, 10), 2_000, 1_000),
        operation("alice", "siteB", date(2024, 1, 11), 5_000, 0),
        operation("carol", "siteB", date(2024, 1, 13), 1_000, 4_550),
    ] {
        repo.create_operation(input).await.expect("Seed operation");
    }
    let ledger = Ledger::new(Arc::clone(&repo));
    (repo, ledger)
}

#[tokio::test]
async fn daily_figures_for_a_single_operation() {
    let repo = Arc::new(MemoryRepository::new());
    repo.create_operation(operation("alice", "siteA", date(2024, 1, 10), 10_000, 15_000))
        .await
        .expect("Create operation");
    let ledger = Ledger::new(repo);

    let day = date(2024, 1, 10);
    assert_eq!(ledger.total_profit(day).await.unwrap().to_string(), "150.00");
    assert_eq!(ledger.total_deposit(day).await.unwrap().to_string(), "100.00");
    assert_eq!(ledger.net_profit(day).await.unwrap().to_string(), "50.00");
}

#[tokio::test]
async fn empty_store_aggregates_to_zero() {
    let ledger = Ledger::new(Arc::new(MemoryRepository::new()));

    assert_eq!(ledger.total_profit_overall().await.unwrap(), Amount::zero());
    assert_eq!(ledger.total_deposit_overall().await.unwrap(), Amount::zero());
    assert_eq!(ledger.net_profit_overall().await.unwrap().to_string(), "0.00");
    assert_eq!(
        ledger.daily_summary(date(2024, 1, 10)).await.unwrap(),
        ProfitSummary::default()
    );
    assert!(ledger.profit_by_day().await.unwrap().is_empty());
    assert_eq!(ledger.total_profit_by_platform("nowhere").await.unwrap(), Amount::zero());
}

#[tokio::test]
async fn overall_totals_match_listing() {
    let (repo, ledger) = seeded().await;

    let listed: Amount = repo
        .get_all_operations()
        .await
        .expect("List operations")
        .iter()
        .map(|op| op.profit_amount)
        .sum();

    assert_eq!(ledger.total_profit_overall().await.unwrap(), listed);
    assert_eq!(listed.to_string(), "205.50");
    assert_eq!(ledger.total_deposit_overall().await.unwrap().to_string(), "180.00");
    assert_eq!(ledger.net_profit_overall().await.unwrap().to_string(), "25.50");
}

#[tokio::test]
async fn net_profit_equals_profit_minus_deposit_for_every_date() {
    let (_repo, ledger) = seeded().await;

    for day in 9..=14 {
        let on = date(2024, 1, day);
        let profit = ledger.total_profit(on).await.unwrap();
        let deposit = ledger.total_deposit(on).await.unwrap();
        assert_eq!(ledger.net_profit(on).await.unwrap(), profit - deposit);

        let summary = ledger.daily_summary(on).await.unwrap();
        assert_eq!(summary, ProfitSummary::new(profit, deposit));
    }
}

#[tokio::test]
async fn profit_by_day_keys_are_the_distinct_dates() {
    let (_repo, ledger) = seeded().await;

    let by_day = ledger.profit_by_day().await.unwrap();
    let keys: Vec<_> = by_day.keys().copied().collect();
    assert_eq!(keys, vec![date(2024, 1, 10), date(2024, 1, 11), date(2024, 1, 13)]);
    assert_eq!(by_day[&date(2024, 1, 10)].to_string(), "160.00");
    assert_eq!(by_day[&date(2024, 1, 11)].to_string(), "0.00");
    assert!(!by_day.contains_key(&date(2024, 1, 12)));
}

#[tokio::test]
async fn same_day_profits_add_up() {
    let repo = Arc::new(MemoryRepository::new());
    repo.create_operation(operation("alice", "siteA", date(2024, 1, 10), 0, 1_000))
        .await
        .expect("Create first");
    repo.create_operation(operation("bob", "siteB", date(2024, 1, 10), 0, 2_000))
        .await
        .expect("Create second");

    let by_day = Ledger::new(repo).profit_by_day().await.unwrap();
    assert_eq!(by_day.len(), 1);
    assert_eq!(by_day[&date(2024, 1, 10)].to_string(), "30.00");
}

#[tokio::test]
async fn platform_and_account_scopes() {
    let (_repo, ledger) = seeded().await;

    assert_eq!(ledger.total_profit_by_platform("siteA").await.unwrap().to_string(), "160.00");
    assert_eq!(ledger.net_profit_by_platform("siteA").await.unwrap().to_string(), "40.00");
    assert_eq!(ledger.total_profit_by_account("alice").await.unwrap().to_string(), "150.00");
    assert_eq!(ledger.net_profit_by_account("alice").await.unwrap().to_string(), "0.00");

    let by_platform = ledger.profit_by_platform().await.unwrap();
    assert_eq!(by_platform.keys().cloned().collect::<Vec<_>>(), vec!["siteA", "siteB"]);
    let by_account = ledger.profit_by_account().await.unwrap();
    assert_eq!(by_account["carol"].to_string(), "45.50");
}

#[tokio::test]
async fn period_summary_is_inclusive_and_checks_order() {
    let (_repo, ledger) = seeded().await;

    let summary = ledger
        .period_summary(date(2024, 1, 10), date(2024, 1, 11))
        .await
        .unwrap();
    assert_eq!(summary.profit_total.to_string(), "160.00");
    assert_eq!(summary.deposit_total.to_string(), "170.00");
    assert_eq!(summary.net_profit.to_string(), "-10.00");

    let reversed = ledger.period_summary(date(2024, 1, 11), date(2024, 1, 10)).await;
    assert!(matches!(reversed, Err(AnalyticsError::InvalidPeriod { .. })));
}

#[tokio::test]
async fn summary_serializes_with_fixed_decimals() {
    let summary = ProfitSummary::new(Amount::from_cents(15_000), Amount::from_cents(10_000));
    let json = serde_json::to_value(summary).expect("Serialize summary");
    assert_eq!(
        json,
        serde_json::json!({
            "profit_total": "150.00",
            "deposit_total": "100.00",
            "net_profit": "50.00"
        })
    );
}
