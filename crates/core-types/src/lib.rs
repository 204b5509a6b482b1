pub mod amount;
pub mod error;
pub mod inputs;
pub mod records;

// Re-export the core types to provide a clean public API.
pub use amount::Amount;
pub use error::CoreError;
pub use inputs::{AccountInput, OperationInput, PlatformInput};
pub use records::{Account, Operation, Platform, RecordId};
