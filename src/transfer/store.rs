//! Storage seam for the transfer core
//!
//! The core never touches SQL directly. It opens a [`LedgerTx`] from a
//! [`LedgerStore`], drives every step through it, and ends it with exactly one
//! of `commit` or `rollback`. Dropping a transaction without either must roll
//! it back.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{NewLedgerEntry, PocketId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A UNIQUE constraint rejected the write (constraint name when known)
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("{0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(
                    db_err.constraint().unwrap_or("unknown").to_string(),
                );
            }
        }
        StoreError::Backend(e.to_string())
    }
}

/// Opens transactions against the ledger
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError>;
}

/// One open storage transaction, exclusively owned by one request
#[async_trait]
pub trait LedgerTx: Send {
    /// Id of the ledger entry recorded under `key`, if any
    async fn find_entry_by_key(&mut self, key: &str) -> Result<Option<i64>, StoreError>;

    /// Pocket owned by `username`, without locking
    async fn resolve_pocket(&mut self, username: &str) -> Result<Option<PocketId>, StoreError>;

    /// Exclusively lock a pocket row and read its balance
    async fn lock_pocket(&mut self, pocket: PocketId) -> Result<Option<Decimal>, StoreError>;

    /// Add `delta` (negative to debit) to a locked pocket
    async fn adjust_balance(&mut self, pocket: PocketId, delta: Decimal) -> Result<(), StoreError>;

    /// Append a ledger entry; a reused key surfaces as `UniqueViolation`
    async fn insert_entry(&mut self, entry: &NewLedgerEntry) -> Result<i64, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
