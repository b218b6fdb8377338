//! Balance Locker
//!
//! Locks are always taken in ascending pocket id, never sender-then-receiver.
//! Two opposite-direction transfers between the same pair therefore queue on
//! the same first row instead of each holding one lock and waiting on the
//! other.

use super::error::{Party, TransferError};
use super::store::LedgerTx;
use super::types::{LockedPockets, PocketId};

/// Canonical lock order for a pair of distinct pockets
pub fn lock_order(a: PocketId, b: PocketId) -> (PocketId, PocketId) {
    if a <= b { (a, b) } else { (b, a) }
}

pub async fn lock_pair(
    tx: &mut dyn LedgerTx,
    sender: &str,
    receiver: &str,
) -> Result<LockedPockets, TransferError> {
    let sender_pocket = tx
        .resolve_pocket(sender)
        .await?
        .ok_or(TransferError::NotFound(Party::Sender))?;
    let receiver_pocket = tx
        .resolve_pocket(receiver)
        .await?
        .ok_or(TransferError::NotFound(Party::Receiver))?;

    if sender_pocket == receiver_pocket {
        return Err(TransferError::SelfTransfer);
    }

    let (first, second) = lock_order(sender_pocket, receiver_pocket);
    let first_balance = lock_one(tx, first, party_of(first, sender_pocket)).await?;
    let second_balance = lock_one(tx, second, party_of(second, sender_pocket)).await?;

    let (sender_balance, receiver_balance) = if first == sender_pocket {
        (first_balance, second_balance)
    } else {
        (second_balance, first_balance)
    };

    tracing::debug!(
        sender_pocket = %sender_pocket,
        receiver_pocket = %receiver_pocket,
        first = %first,
        "Pockets locked"
    );

    Ok(LockedPockets {
        sender: sender_pocket,
        sender_balance,
        receiver: receiver_pocket,
        receiver_balance,
    })
}

fn party_of(pocket: PocketId, sender_pocket: PocketId) -> Party {
    if pocket == sender_pocket {
        Party::Sender
    } else {
        Party::Receiver
    }
}

async fn lock_one(
    tx: &mut dyn LedgerTx,
    pocket: PocketId,
    party: Party,
) -> Result<rust_decimal::Decimal, TransferError> {
    // A pocket resolved a moment ago but gone at lock time is reported like
    // any other missing party.
    tx.lock_pocket(pocket)
        .await?
        .ok_or(TransferError::NotFound(party))
}
