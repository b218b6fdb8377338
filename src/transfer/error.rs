//! Transfer Error Types

use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;

use super::store::StoreError;

/// Which side of a transfer an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Sender,
    Receiver,
}

impl Party {
    pub fn as_str(&self) -> &'static str {
        match self {
            Party::Sender => "sender",
            Party::Receiver => "receiver",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transfer error types
///
/// Every variant aborts the request; none are retried here. Retrying is the
/// caller's job and is made safe by the idempotency key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    // === Authorization ===
    #[error("Sender does not match authenticated user")]
    PrincipalMismatch,

    // === Validation ===
    #[error("Invalid input: {0}")]
    MalformedInput(String),

    #[error("Amount must be positive with at most 2 decimal places")]
    InvalidAmount,

    #[error("Sender and receiver must be different accounts")]
    SelfTransfer,

    // === Resolution / funds ===
    #[error("{0} not found")]
    NotFound(Party),

    #[error("Insufficient balance")]
    InsufficientFunds,

    // === Idempotency ===
    #[error("Duplicate transaction")]
    DuplicateRequest,

    // === System ===
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Transaction commit failed: {0}")]
    CommitFailure(String),

    #[error("Transfer timed out before commit")]
    Timeout,
}

impl TransferError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::PrincipalMismatch => "PRINCIPAL_MISMATCH",
            TransferError::MalformedInput(_) => "MALFORMED_INPUT",
            TransferError::InvalidAmount => "INVALID_AMOUNT",
            TransferError::SelfTransfer => "SELF_TRANSFER",
            TransferError::NotFound(_) => "NOT_FOUND",
            TransferError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            TransferError::DuplicateRequest => "DUPLICATE_REQUEST",
            TransferError::StorageError(_) => "STORAGE_ERROR",
            TransferError::CommitFailure(_) => "COMMIT_FAILURE",
            TransferError::Timeout => "TIMEOUT",
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            TransferError::PrincipalMismatch => StatusCode::FORBIDDEN,
            TransferError::MalformedInput(_)
            | TransferError::InvalidAmount
            | TransferError::SelfTransfer
            | TransferError::InsufficientFunds => StatusCode::BAD_REQUEST,
            TransferError::NotFound(_) => StatusCode::NOT_FOUND,
            TransferError::DuplicateRequest => StatusCode::CONFLICT,
            TransferError::StorageError(_) | TransferError::CommitFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            TransferError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message safe to return to the caller; storage details stay in the logs
    pub fn public_message(&self) -> String {
        match self {
            TransferError::StorageError(_) => "Internal storage error".to_string(),
            TransferError::CommitFailure(_) => "Transaction commit failed".to_string(),
            other => other.to_string(),
        }
    }

    /// Server-side failures, as opposed to rejected requests
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            TransferError::StorageError(_) | TransferError::CommitFailure(_)
        )
    }
}

impl From<StoreError> for TransferError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation(_) => TransferError::DuplicateRequest,
            StoreError::Backend(msg) => TransferError::StorageError(msg),
        }
    }
}
