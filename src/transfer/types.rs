//! Transfer Core Types

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::TransferError;
use crate::money;

/// Longest idempotency key the ledger accepts
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 128;

/// Pocket (balance row) identifier.
///
/// Ordered: locks are always taken in ascending `PocketId` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PocketId(pub i64);

impl fmt::Display for PocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `POST /process` body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TransferRequest {
    #[schema(example = "alice")]
    pub sender: String,
    #[schema(example = "bob")]
    pub receiver: String,
    #[serde(deserialize_with = "money::deserialize_amount")]
    #[schema(value_type = f64, example = 40.0)]
    pub amount: Decimal,
    #[schema(example = "7d0e6a0c-4b7e-4a55-9f55-2b8f0c3a9a11")]
    pub idempotency_key: String,
}

impl TransferRequest {
    /// Shape checks that need no storage access
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.sender.trim().is_empty() {
            return Err(TransferError::MalformedInput("sender is required".into()));
        }
        if self.receiver.trim().is_empty() {
            return Err(TransferError::MalformedInput("receiver is required".into()));
        }
        // The key is stored exactly as sent
        let key = self.idempotency_key.as_str();
        if key.trim().is_empty() {
            return Err(TransferError::MalformedInput(
                "idempotency_key is required".into(),
            ));
        }
        if key.trim() != key {
            return Err(TransferError::MalformedInput(
                "idempotency_key must not have surrounding whitespace".into(),
            ));
        }
        if key.len() > MAX_IDEMPOTENCY_KEY_LEN {
            return Err(TransferError::MalformedInput(format!(
                "idempotency_key longer than {} bytes",
                MAX_IDEMPOTENCY_KEY_LEN
            )));
        }
        if !money::is_valid_amount(self.amount) {
            return Err(TransferError::InvalidAmount);
        }
        if self.sender == self.receiver {
            return Err(TransferError::SelfTransfer);
        }
        Ok(())
    }
}

/// Both pockets of a transfer, locked, with their balances at lock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockedPockets {
    pub sender: PocketId,
    pub sender_balance: Decimal,
    pub receiver: PocketId,
    pub receiver_balance: Decimal,
}

/// Ledger row to append for a transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerEntry {
    pub sender: PocketId,
    pub receiver: PocketId,
    pub amount: Decimal,
    pub idempotency_key: String,
}

/// Confirmation of a committed transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub entry_id: i64,
    pub sender: String,
    pub receiver: String,
    pub amount: Decimal,
}

impl TransferReceipt {
    pub fn message(&self) -> String {
        format!(
            "{} transferred from {} to {}",
            money::format_usd(self.amount),
            self.sender,
            self.receiver
        )
    }
}

/// `POST /process` success body
#[derive(Debug, Serialize, ToSchema)]
pub struct TransferResponse {
    #[schema(example = "success")]
    pub status: String,
    #[schema(example = "$40.00 transferred from alice to bob")]
    pub message: String,
}

impl From<&TransferReceipt> for TransferResponse {
    fn from(receipt: &TransferReceipt) -> Self {
        Self {
            status: "success".to_string(),
            message: receipt.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(sender: &str, receiver: &str, amount: Decimal, key: &str) -> TransferRequest {
        TransferRequest {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
            idempotency_key: key.into(),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("alice", "bob", Decimal::new(4000, 2), "k1").validate().is_ok());
    }

    #[test]
    fn test_padded_key_rejected() {
        let key = format!(" {} ", "k".repeat(MAX_IDEMPOTENCY_KEY_LEN));
        let err = request("alice", "bob", Decimal::ONE, &key).validate().unwrap_err();
        assert!(matches!(err, TransferError::MalformedInput(_)));
        let err = request("alice", "bob", Decimal::ONE, "k1\n").validate().unwrap_err();
        assert!(matches!(err, TransferError::MalformedInput(_)));

        let at_limit = "k".repeat(MAX_IDEMPOTENCY_KEY_LEN);
        assert!(request("alice", "bob", Decimal::ONE, &at_limit).validate().is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let err = request("", "bob", Decimal::ONE, "k1").validate().unwrap_err();
        assert!(matches!(err, TransferError::MalformedInput(_)));
        let err = request("alice", " ", Decimal::ONE, "k1").validate().unwrap_err();
        assert!(matches!(err, TransferError::MalformedInput(_)));
        let err = request("alice", "bob", Decimal::ONE, "").validate().unwrap_err();
        assert!(matches!(err, TransferError::MalformedInput(_)));
        let long_key = "k".repeat(MAX_IDEMPOTENCY_KEY_LEN + 1);
        let err = request("alice", "bob", Decimal::ONE, &long_key).validate().unwrap_err();
        assert!(matches!(err, TransferError::MalformedInput(_)));
    }

    #[test]
    fn test_non_positive_amount() {
        for amount in [Decimal::ZERO, Decimal::new(-40, 0), Decimal::new(1, 3)] {
            assert_eq!(
                request("alice", "bob", amount, "k1").validate(),
                Err(TransferError::InvalidAmount)
            );
        }
    }

    #[test]
    fn test_self_transfer_rejected() {
        assert_eq!(
            request("alice", "alice", Decimal::ONE, "k1").validate(),
            Err(TransferError::SelfTransfer)
        );
    }

    #[test]
    fn test_pocket_ids_order_numerically() {
        assert!(PocketId(2) < PocketId(10));
        assert_eq!(PocketId(7).to_string(), "7");
    }

    #[test]
    fn test_receipt_message() {
        let receipt = TransferReceipt {
            entry_id: 1,
            sender: "alice".into(),
            receiver: "bob".into(),
            amount: Decimal::new(40, 0),
        };
        assert_eq!(receipt.message(), "$40.00 transferred from alice to bob");
        let resp = TransferResponse::from(&receipt);
        assert_eq!(resp.status, "success");
    }

    #[test]
    fn test_request_from_json() {
        let req: TransferRequest = serde_json::from_str(
            r#"{"sender":"alice","receiver":"bob","amount":40.25,"idempotency_key":"abc"}"#,
        )
        .unwrap();
        assert_eq!(req.amount, Decimal::new(4025, 2));

        let missing_key = serde_json::from_str::<TransferRequest>(
            r#"{"sender":"alice","receiver":"bob","amount":1}"#,
        );
        assert!(missing_key.is_err());
    }
}
