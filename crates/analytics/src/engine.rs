use crate::report::ProfitSummary;
use chrono::NaiveDate;
use core_types::{Amount, Operation};
use std::collections::BTreeMap;

/// A stateless calculator for the ledger's money totals.
///
/// Every sum starts from an exact `0.00` and stays in fixed-point, so an empty
/// slice yields zero and no amount ever passes through a float.
#[derive(Debug, Default, Clone, Copy)]
pub struct AggregationEngine {}

impl AggregationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of `profit_amount`.
    pub fn total_profit(&self, operations: &[Operation]) -> Amount {
        operations.iter().map(|op| op.profit_amount).sum()
    }

    /// Sum of `deposit_amount`.
    pub fn total_deposit(&self, operations: &[Operation]) -> Amount {
        operations.iter().map(|op| op.deposit_amount).sum()
    }

    /// Profit total minus deposit total over the same operations.
    pub fn net_profit(&self, operations: &[Operation]) -> Amount {
        self.total_profit(operations) - self.total_deposit(operations)
    }

    pub fn summarize(&self, operations: &[Operation]) -> ProfitSummary {
        ProfitSummary::new(self.total_profit(operations), self.total_deposit(operations))
    }

    /// Profit per date. Only dates with at least one operation appear.
    pub fn profit_by_day(&self, operations: &[Operation]) -> BTreeMap<NaiveDate, Amount> {
        group_profit(operations, |op| op.date)
    }

    /// Profit per platform link.
    pub fn profit_by_platform(&self, operations: &[Operation]) -> BTreeMap<String, Amount> {
        group_profit(operations, |op| op.platform.link.clone())
    }

    /// Profit per account name.
    pub fn profit_by_account(&self, operations: &[Operation]) -> BTreeMap<String, Amount> {
        group_profit(operations, |op| op.account.name.clone())
    }
}

fn group_profit<K, F>(operations: &[Operation], key: F) -> BTreeMap<K, Amount>
where
    K: Ord,
    F: Fn(&Operation) -> K,
{
    let mut groups = BTreeMap::new();
    for op in operations {
        let entry = groups.entry(key(op)).or_insert_with(Amount::zero);
        *entry = *entry + op.profit_amount;
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Account, Platform};

    fn op(id: i64, day: u32, deposit_cents: i64, profit_cents: i64, link: &str, name: &str) -> Operation {
        Operation {
            id,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            deposit_amount: Amount::from_cents(deposit_cents),
            slot_name: None,
            status: "GREEN".to_string(),
            profit_amount: Amount::from_cents(profit_cents),
            withdrawal_complete: false,
            platform: Platform { id: 1, link: link.to_string() },
            account: Account { id: 1, name: name.to_string() },
        }
    }

    #[test]
    fn empty_input_sums_to_zero() {
        let engine = AggregationEngine::new();
        assert_eq!(engine.total_profit(&[]).to_string(), "0.00");
        assert_eq!(engine.total_deposit(&[]).to_string(), "0.00");
        assert_eq!(engine.net_profit(&[]).to_string(), "0.00");
        assert_eq!(engine.summarize(&[]), ProfitSummary::default());
        assert!(engine.profit_by_day(&[]).is_empty());
    }

    #[test]
    fn net_profit_is_profit_minus_deposit() {
        let engine = AggregationEngine::new();
        let ops = [op(1, 10, 10_000, 15_000, "siteA", "alice")];

        assert_eq!(engine.total_profit(&ops).to_string(), "150.00");
        assert_eq!(engine.total_deposit(&ops).to_string(), "100.00");
        assert_eq!(engine.net_profit(&ops).to_string(), "50.00");

        let summary = engine.summarize(&ops);
        assert_eq!(summary.net_profit, summary.profit_total - summary.deposit_total);
    }

    #[test]
    fn decimal_sums_do_not_drift() {
        let engine = AggregationEngine::new();
        // 0.10 + 0.20 is the classic float failure.
        let ops = [op(1, 10, 0, 10, "a", "x"), op(2, 10, 0, 20, "a", "x")];
        assert_eq!(engine.total_profit(&ops), Amount::from_cents(30));

        let many: Vec<_> = (0..1_000).map(|i| op(i, 10, 1, 1, "a", "x")).collect();
        assert_eq!(engine.total_profit(&many).to_string(), "10.00");
    }

    #[test]
    fn profit_by_day_has_only_present_dates() {
        let engine = AggregationEngine::new();
        let ops = [
            op(1, 10, 0, 1_000, "a", "x"),
            op(2, 10, 0, 2_000, "a", "x"),
            op(3, 12, 0, -500, "a", "x"),
        ];

        let by_day = engine.profit_by_day(&ops);
        let expected: Vec<(NaiveDate, Amount)> = vec![
            (NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), Amount::from_cents(3_000)),
            (NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(), Amount::from_cents(-500)),
        ];
        assert_eq!(by_day.into_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn groups_by_platform_and_account() {
        let engine = AggregationEngine::new();
        let ops = [
            op(1, 10, 0, 1_000, "siteA", "alice"),
            op(2, 11, 0, 2_000, "siteB", "alice"),
            op(3, 12, 0, 4_000, "siteA", "bob"),
        ];

        let by_platform = engine.profit_by_platform(&ops);
        assert_eq!(by_platform["siteA"], Amount::from_cents(5_000));
        assert_eq!(by_platform["siteB"], Amount::from_cents(2_000));

        let by_account = engine.profit_by_account(&ops);
        assert_eq!(by_account["alice"], Amount::from_cents(3_000));
        assert_eq!(by_account["bob"], Amount::from_cents(4_000));
        assert_eq!(by_account.len(), 2);
    }
}
