//! Pocket-to-pocket transfer core
//!
//! # Flow
//!
//! ```text
//! Auth Gate → Idempotency Guard → Balance Locker → Transfer Executor
//!                 └──────────── one storage transaction ────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. **Conservation**: a committed transfer debits and credits the same
//!    amount; the pair's total balance never changes.
//! 2. **All or nothing**: debit, credit and ledger insert commit together or
//!    not at all.
//! 3. **Exactly once**: the idempotency key is UNIQUE in storage; a reused key
//!    is rejected as a duplicate whether caught by the guard or the insert.
//! 4. **Deadlock-free locking**: pocket rows are locked in ascending id order.
//!
//! No in-process locks: all coordination between concurrent requests is the
//! storage engine's row locks and constraints.

pub mod error;
pub mod executor;
pub mod guard;
pub mod locker;
pub mod pg;
pub mod state;
pub mod store;
pub mod types;

#[cfg(test)]
pub mod mock;


pub use error::{Party, TransferError};
pub use executor::TransferService;
pub use pg::PgLedgerStore;
pub use state::{TransferRun, TransferState};
pub use store::{LedgerStore, LedgerTx, StoreError};
pub use types::{PocketId, TransferReceipt, TransferRequest, TransferResponse};
