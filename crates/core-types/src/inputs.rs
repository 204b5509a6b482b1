use crate::amount::Amount;
use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const MAX_KEY_LEN: usize = 255;
const MAX_STATUS_LEN: usize = 50;
const MAX_SLOT_NAME_LEN: usize = 255;

/// Write payload for an account. Also used as the natural-key reference
/// inside an [`OperationInput`]; any other fields sent alongside are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInput {
    pub name: String,
}

/// Write payload for a platform, keyed by `link`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformInput {
    pub link: String,
}

/// Write payload for an operation. The platform and account are referenced by
/// their natural keys and resolved (or created) by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationInput {
    pub date: NaiveDate,
    pub deposit_amount: Amount,
    #[serde(default)]
    pub slot_name: Option<String>,
    pub status: String,
    pub profit_amount: Amount,
    pub withdrawal_complete: bool,
    pub platform: PlatformInput,
    pub account: AccountInput,
}

fn required_text(field: &str, value: &str, max_len: usize) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid(field, "must not be blank"));
    }
    if trimmed.chars().count() > max_len {
        return Err(CoreError::invalid(
            field,
            format!("must be at most {max_len} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

impl AccountInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the input with its name trimmed, or why it cannot be stored.
    pub fn validated(self) -> Result<Self, CoreError> {
        Ok(Self {
            name: required_text("name", &self.name, MAX_KEY_LEN)?,
        })
    }
}

impl PlatformInput {
    pub fn new(link: impl Into<String>) -> Self {
        Self { link: link.into() }
    }

    pub fn validated(self) -> Result<Self, CoreError> {
        Ok(Self {
            link: required_text("link", &self.link, MAX_KEY_LEN)?,
        })
    }
}

impl OperationInput {
    /// Checks every field and normalises the text ones.
    ///
    /// A blank slot name is stored as absent. Profit may be negative; the
    /// deposit may not.
    pub fn validated(self) -> Result<Self, CoreError> {
        if self.deposit_amount.is_negative() {
            return Err(CoreError::invalid("deposit_amount", "must not be negative"));
        }

        let slot_name = match self.slot_name.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(slot) if slot.chars().count() > MAX_SLOT_NAME_LEN => {
                return Err(CoreError::invalid(
                    "slot_name",
                    format!("must be at most {MAX_SLOT_NAME_LEN} characters"),
                ));
            }
            Some(slot) => Some(slot.to_string()),
        };

        let platform = PlatformInput {
            link: required_text("platform.link", &self.platform.link, MAX_KEY_LEN)?,
        };
        let account = AccountInput {
            name: required_text("account.name", &self.account.name, MAX_KEY_LEN)?,
        };

        Ok(Self {
            date: self.date,
            deposit_amount: self.deposit_amount,
            slot_name,
            status: required_text("status", &self.status, MAX_STATUS_LEN)?,
            profit_amount: self.profit_amount,
            withdrawal_complete: self.withdrawal_complete,
            platform,
            account,
        })
    }
}
