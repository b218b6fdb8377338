//! Transfer Executor
//!
//! Runs one request through the state machine inside a single storage
//! transaction. Every step returns a `Result`; [`TransferService::execute`] is
//! the only place that decides between commit and rollback, and it commits
//! only when every step succeeded.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use super::error::TransferError;
use super::guard::ensure_unused_key;
use super::locker::lock_pair;
use super::state::{TransferRun, TransferState};
use super::store::{LedgerStore, LedgerTx};
use super::types::{LockedPockets, NewLedgerEntry, TransferReceipt, TransferRequest};
use crate::auth::Principal;

/// Sufficiency check on locked balances
pub fn ensure_sufficient(locked: &LockedPockets, amount: Decimal) -> Result<(), TransferError> {
    if amount <= Decimal::ZERO {
        return Err(TransferError::InvalidAmount);
    }
    if locked.sender_balance < amount {
        return Err(TransferError::InsufficientFunds);
    }
    Ok(())
}

pub struct TransferService {
    store: Arc<dyn LedgerStore>,
    timeout: Duration,
}

impl TransferService {
    pub fn new(store: Arc<dyn LedgerStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Execute one transfer on behalf of `principal`.
    ///
    /// The deadline covers every step up to, but not including, the commit.
    /// Once it has elapsed the transaction is rolled back and no commit is
    /// attempted.
    pub async fn execute(
        &self,
        principal: &Principal,
        req: &TransferRequest,
    ) -> Result<TransferReceipt, TransferError> {
        let mut run = TransferRun::new();
        match self.run_to_completion(&mut run, principal, req).await {
            Ok(receipt) => {
                tracing::info!(
                    entry_id = receipt.entry_id,
                    sender = %req.sender,
                    receiver = %req.receiver,
                    amount = %req.amount,
                    idempotency_key = %req.idempotency_key,
                    "Transfer committed"
                );
                Ok(receipt)
            }
            Err(e) => {
                run.abort();
                if e.is_internal() {
                    tracing::error!(
                        stage = %run.reached(),
                        sender = %req.sender,
                        idempotency_key = %req.idempotency_key,
                        error = %e,
                        "Transfer aborted"
                    );
                } else {
                    tracing::warn!(
                        stage = %run.reached(),
                        sender = %req.sender,
                        receiver = %req.receiver,
                        idempotency_key = %req.idempotency_key,
                        reason = e.code(),
                        "Transfer rejected"
                    );
                }
                Err(e)
            }
        }
    }

    async fn run_to_completion(
        &self,
        run: &mut TransferRun,
        principal: &Principal,
        req: &TransferRequest,
    ) -> Result<TransferReceipt, TransferError> {
        // Authenticating: the credential was verified upstream; the principal
        // may only move its own funds.
        if req.sender != principal.username {
            return Err(TransferError::PrincipalMismatch);
        }
        run.advance(TransferState::Validating);
        req.validate()?;

        let deadline = tokio::time::Instant::now() + self.timeout;

        let mut tx = tokio::time::timeout_at(deadline, self.store.begin())
            .await
            .map_err(|_| TransferError::Timeout)??;

        let prepared = tokio::time::timeout_at(deadline, prepare(run, tx.as_mut(), req)).await;

        let entry_id = match prepared {
            Ok(Ok(entry_id)) => entry_id,
            Ok(Err(e)) => {
                rollback(tx).await;
                return Err(e);
            }
            Err(_) => {
                rollback(tx).await;
                return Err(TransferError::Timeout);
            }
        };

        tx.commit()
            .await
            .map_err(|e| TransferError::CommitFailure(e.to_string()))?;
        run.advance(TransferState::Committed);

        Ok(TransferReceipt {
            entry_id,
            sender: req.sender.clone(),
            receiver: req.receiver.clone(),
            amount: req.amount,
        })
    }
}

/// Guard, lock, check and apply. Leaves the transaction ready to commit.
async fn prepare(
    run: &mut TransferRun,
    tx: &mut dyn LedgerTx,
    req: &TransferRequest,
) -> Result<i64, TransferError> {
    ensure_unused_key(tx, &req.idempotency_key).await?;

    run.advance(TransferState::Locking);
    let locked = lock_pair(tx, &req.sender, &req.receiver).await?;

    run.advance(TransferState::Checking);
    ensure_sufficient(&locked, req.amount)?;

    run.advance(TransferState::Applying);
    tx.adjust_balance(locked.sender, -req.amount).await?;
    tx.adjust_balance(locked.receiver, req.amount).await?;
    let entry_id = tx
        .insert_entry(&NewLedgerEntry {
            sender: locked.sender,
            receiver: locked.receiver,
            amount: req.amount,
            idempotency_key: req.idempotency_key.clone(),
        })
        .await?;

    Ok(entry_id)
}

async fn rollback(tx: Box<dyn LedgerTx>) {
    // A failed rollback still leaves nothing committed: the server discards
    // the transaction once the connection is gone.
    if let Err(e) = tx.rollback().await {
        tracing::error!(error = %e, "Rollback failed");
    }
}
