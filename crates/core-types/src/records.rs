use crate::amount::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the store on insert.
pub type RecordId = i64;

/// A named holder that operations are attributed to.
///
/// Identity is the `id`; compare ids directly rather than whole records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: RecordId,
    pub name: String,
}

/// A betting site, keyed by its unique link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: RecordId,
    pub link: String,
}

/// One recorded betting operation with its resolved platform and account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub id: RecordId,
    pub date: NaiveDate,
    pub deposit_amount: Amount,
    pub slot_name: Option<String>,
    pub status: String,
    pub profit_amount: Amount,
    pub withdrawal_complete: bool,
    pub platform: Platform,
    pub account: Account,
}
