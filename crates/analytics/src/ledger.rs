use crate::engine::AggregationEngine;
use crate::error::AnalyticsError;
use crate::report::ProfitSummary;
use chrono::NaiveDate;
use core_types::Amount;
use database::OperationStore;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Rejects a range whose start falls after its end. Both bounds are inclusive,
/// so `start == end` is a single day.
pub fn check_period(start: NaiveDate, end: NaiveDate) -> Result<(), AnalyticsError> {
    if start > end {
        return Err(AnalyticsError::InvalidPeriod {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}

/// Answers the ledger's money questions by reading from an operation store
/// and handing the rows to the [`AggregationEngine`]. Never writes.
///
/// Each query reads its operations once, so a net figure is always computed
/// from the same rows as the profit and deposit it is derived from.
pub struct Ledger<S: ?Sized> {
    store: Arc<S>,
    engine: AggregationEngine,
}

impl<S: ?Sized> Clone for Ledger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            engine: self.engine,
        }
    }
}

impl<S> Ledger<S>
where
    S: OperationStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            engine: AggregationEngine::new(),
        }
    }

    // --- Per date ---

    pub async fn total_profit(&self, date: NaiveDate) -> Result<Amount, AnalyticsError> {
        let operations = self.store.find_operations_by_date(date).await?;
        Ok(self.engine.total_profit(&operations))
    }

    pub async fn total_deposit(&self, date: NaiveDate) -> Result<Amount, AnalyticsError> {
        let operations = self.store.find_operations_by_date(date).await?;
        Ok(self.engine.total_deposit(&operations))
    }

    pub async fn net_profit(&self, date: NaiveDate) -> Result<Amount, AnalyticsError> {
        Ok(self.daily_summary(date).await?.net_profit)
    }

    pub async fn daily_summary(&self, date: NaiveDate) -> Result<ProfitSummary, AnalyticsError> {
        let operations = self.store.find_operations_by_date(date).await?;
        tracing::debug!(%date, operations = operations.len(), "Summarising day.");
        Ok(self.engine.summarize(&operations))
    }

    /// Summary over an inclusive date range.
    pub async fn period_summary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ProfitSummary, AnalyticsError> {
        check_period(start, end)?;
        let operations = self.store.find_operations_by_date_range(start, end).await?;
        tracing::debug!(%start, %end, operations = operations.len(), "Summarising period.");
        Ok(self.engine.summarize(&operations))
    }

    // --- Whole store ---

    pub async fn total_profit_overall(&self) -> Result<Amount, AnalyticsError> {
        let operations = self.store.get_all_operations().await?;
        Ok(self.engine.total_profit(&operations))
    }

    pub async fn total_deposit_overall(&self) -> Result<Amount, AnalyticsError> {
        let operations = self.store.get_all_operations().await?;
        Ok(self.engine.total_deposit(&operations))
    }

    pub async fn net_profit_overall(&self) -> Result<Amount, AnalyticsError> {
        Ok(self.overall_summary().await?.net_profit)
    }

    pub async fn overall_summary(&self) -> Result<ProfitSummary, AnalyticsError> {
        let operations = self.store.get_all_operations().await?;
        Ok(self.engine.summarize(&operations))
    }

    // --- Per platform / account ---

    pub async fn total_profit_by_platform(&self, link: &str) -> Result<Amount, AnalyticsError> {
        let operations = self.store.find_operations_by_platform_link(link).await?;
        Ok(self.engine.total_profit(&operations))
    }

    pub async fn total_profit_by_account(&self, name: &str) -> Result<Amount, AnalyticsError> {
        let operations = self.store.find_operations_by_account_name(name).await?;
        Ok(self.engine.total_profit(&operations))
    }

    pub async fn net_profit_by_platform(&self, link: &str) -> Result<Amount, AnalyticsError> {
        let operations = self.store.find_operations_by_platform_link(link).await?;
        Ok(self.engine.net_profit(&operations))
    }

    pub async fn net_profit_by_account(&self, name: &str) -> Result<Amount, AnalyticsError> {
        let operations = self.store.find_operations_by_account_name(name).await?;
        Ok(self.engine.net_profit(&operations))
    }

    // --- Group-bys ---

    pub async fn profit_by_day(&self) -> Result<BTreeMap<NaiveDate, Amount>, AnalyticsError> {
        let operations = self.store.get_all_operations().await?;
        Ok(self.engine.profit_by_day(&operations))
    }

    pub async fn profit_by_platform(&self) -> Result<BTreeMap<String, Amount>, AnalyticsError> {
        let operations = self.store.get_all_operations().await?;
        Ok(self.engine.profit_by_platform(&operations))
    }

    pub async fn profit_by_account(&self) -> Result<BTreeMap<String, Amount>, AnalyticsError> {
        let operations = self.store.get_all_operations().await?;
        Ok(self.engine.profit_by_account(&operations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn period_bounds_are_inclusive() {
        assert!(check_period(day(10), day(10)).is_ok());
        assert!(check_period(day(10), day(11)).is_ok());
    }

    #[test]
    fn reversed_period_names_both_bounds() {
        let err = check_period(day(11), day(10)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid period: start 2024-01-11 is after end 2024-01-10");
    }
}
