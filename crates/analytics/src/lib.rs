//! # Lucrabet Analytics
//!
//! Profit, deposit and net totals over recorded betting operations.
//!
//! ## Architectural Principles
//!
//! - **Stateless Calculation:** The `AggregationEngine` is a pure calculator over
//!   slices of `Operation`s. It has no knowledge of storage, which makes it easy to test.
//! - **Read-Only Service:** The `Ledger` pairs the engine with an `OperationStore`
//!   and never mutates anything.
//!
//! ## Public API
//!
//! - `AggregationEngine`: sums, differences and group-bys.
//! - `Ledger`: the store-backed queries the API exposes.
//! - `ProfitSummary`: profit / deposit / net for one scope.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod ledger;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AggregationEngine;
pub use error::AnalyticsError;
pub use ledger::{check_period, Ledger};
pub use report::ProfitSummary;
