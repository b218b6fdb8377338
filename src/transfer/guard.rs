//! Idempotency Guard
//!
//! Early rejection only. Two concurrent requests can both pass this check;
//! the UNIQUE constraint on the key settles that race at insert time.

use super::error::TransferError;
use super::store::LedgerTx;

pub async fn ensure_unused_key(tx: &mut dyn LedgerTx, key: &str) -> Result<(), TransferError> {
    match tx.find_entry_by_key(key).await {
        Ok(None) => Ok(()),
        Ok(Some(entry_id)) => {
            tracing::warn!(idempotency_key = %key, entry_id, "Idempotency key already used");
            Err(TransferError::DuplicateRequest)
        }
        Err(e) => {
            tracing::error!(idempotency_key = %key, error = %e, "Idempotency lookup failed");
            Err(TransferError::StorageError(e.to_string()))
        }
    }
}
