//! # Lucrabet Database Crate
//!
//! This crate is the persistence layer for accounts, platforms and operation
//! records. It is the system's book of record.
//!
//! ## Architectural Principles
//!
//! - **Store Traits:** `AccountStore`, `PlatformStore` and `OperationStore` define the
//!   contract; callers hold an `Arc<dyn LedgerStore>` and never see SQL.
//! - **Storage-Level Uniqueness:** Get-or-create is an atomic upsert backed by unique
//!   constraints, never a check-then-insert in application code.
//! - **Asynchronous & Pooled:** All PostgreSQL access goes through a shared `PgPool`.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations`: pool construction and schema setup.
//! - `open_store`: the configured backend as an `Arc<dyn LedgerStore>`.
//! - `DbRepository`: the PostgreSQL implementation of every store trait.
//! - `MemoryRepository`: an in-process implementation with the same semantics.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, open_store, run_migrations};
pub use error::DbError;
pub use memory::MemoryRepository;
pub use repository::DbRepository;
pub use store::{AccountStore, LedgerStore, OperationStore, PlatformStore};
