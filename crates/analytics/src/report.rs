use core_types::Amount;
use serde::{Deserialize, Serialize};

/// Profit, deposit and net totals over one scope (a day, a period, or everything).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitSummary {
    pub profit_total: Amount,
    pub deposit_total: Amount,
    pub net_profit: Amount,
}

impl ProfitSummary {
    /// Builds a summary whose net is always exactly `profit - deposit`.
    pub fn new(profit_total: Amount, deposit_total: Amount) -> Self {
        Self {
            profit_total,
            deposit_total,
            net_profit: profit_total - deposit_total,
        }
    }
}

impl Default for ProfitSummary {
    fn default() -> Self {
        Self::new(Amount::zero(), Amount::zero())
    }
}
