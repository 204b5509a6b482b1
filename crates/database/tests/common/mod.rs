use chrono::NaiveDate;
use core_types::{AccountInput, Amount, OperationInput, PlatformInput};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// An operation input with the given natural keys and amounts in cents.
pub fn operation(
    account: &str,
    platform: &str,
    on: NaiveDate,
    deposit_cents: i64,
    profit_cents: i64,
) -> OperationInput {
    OperationInput {
        date: on,
        deposit_amount: Amount::from_cents(deposit_cents),
        slot_name: None,
        status: "GREEN".to_string(),
        profit_amount: Amount::from_cents(profit_cents),
        withdrawal_complete: false,
        platform: PlatformInput::new(platform),
        account: AccountInput::new(account),
    }
}
