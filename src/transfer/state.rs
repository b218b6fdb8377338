//! Per-request transfer state machine
//!
//! ```text
//! AUTHENTICATING → VALIDATING → LOCKING → CHECKING → APPLYING → COMMITTED
//!        └────────────┴────────────┴──────────┴──────────┴──→ ABORTED
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferState {
    /// Principal established, sender ownership being checked
    Authenticating,
    /// Input validated, transaction open, idempotency key being checked
    Validating,
    /// Pocket rows being locked
    Locking,
    /// Sufficiency of the sender balance being checked
    Checking,
    /// Debit, credit and ledger insert in flight, then commit
    Applying,
    /// Terminal: transaction committed
    Committed,
    /// Terminal: transaction rolled back or never committed
    Aborted,
}

impl TransferState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferState::Committed | TransferState::Aborted)
    }

    /// Forward-only: each state has exactly one successor plus `Aborted`
    pub fn can_transition_to(&self, next: TransferState) -> bool {
        use TransferState::*;
        match (self, next) {
            (s, _) if s.is_terminal() => false,
            (_, Aborted) => true,
            (Authenticating, Validating)
            | (Validating, Locking)
            | (Locking, Checking)
            | (Checking, Applying)
            | (Applying, Committed) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferState::Authenticating => "AUTHENTICATING",
            TransferState::Validating => "VALIDATING",
            TransferState::Locking => "LOCKING",
            TransferState::Checking => "CHECKING",
            TransferState::Applying => "APPLYING",
            TransferState::Committed => "COMMITTED",
            TransferState::Aborted => "ABORTED",
        }
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks one request through the state machine
#[derive(Debug)]
pub struct TransferRun {
    state: TransferState,
    /// Last non-terminal state reached, kept for abort diagnostics
    reached: TransferState,
}

impl Default for TransferRun {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferRun {
    pub fn new() -> Self {
        Self {
            state: TransferState::Authenticating,
            reached: TransferState::Authenticating,
        }
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    /// State the run was in when it aborted (or its current state)
    pub fn reached(&self) -> TransferState {
        self.reached
    }

    /// Move to `next`. Illegal transitions are ignored and logged; they
    /// indicate a bug in the executor, never a client error.
    pub fn advance(&mut self, next: TransferState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::error!(from = %self.state, to = %next, "Illegal transfer state transition");
            debug_assert!(false, "illegal transition {} -> {}", self.state, next);
            return false;
        }
        tracing::debug!(from = %self.state, to = %next, "Transfer state transition");
        if !next.is_terminal() {
            self.reached = next;
        }
        self.state = next;
        true
    }

    pub fn abort(&mut self) {
        if !self.state.is_terminal() {
            self.advance(TransferState::Aborted);
        }
    }
}
