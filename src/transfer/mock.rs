//! In-memory ledger store for tests
//!
//! Models the parts of PostgreSQL the transfer core relies on:
//! - writes are buffered per transaction and published only on commit
//! - one store-wide async mutex is held for a transaction's lifetime, a
//!   coarse stand-in for row locks (transactions touching the ledger serialize)
//! - the idempotency key is UNIQUE across committed and pending entries
//! - balances may only be adjusted on pockets locked by the same transaction

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::store::{LedgerStore, LedgerTx, StoreError};
use super::types::{NewLedgerEntry, PocketId};

/// Where to inject a storage failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Begin,
    KeyLookup,
    Lock,
    Debit,
    Credit,
    Insert,
    Commit,
}

#[derive(Debug, Clone)]
pub struct LedgerRow {
    pub id: i64,
    pub sender: PocketId,
    pub receiver: PocketId,
    pub amount: Decimal,
    pub idempotency_key: String,
}

#[derive(Debug, Clone, Default)]
struct LedgerState {
    pockets_by_user: HashMap<String, PocketId>,
    balances: HashMap<PocketId, Decimal>,
    entries: Vec<LedgerRow>,
    next_pocket: i64,
    next_entry: i64,
}

#[derive(Default)]
struct Controls {
    fail_at: Mutex<Option<FailPoint>>,
    skip_key_lookup: AtomicBool,
    lock_delay: Mutex<Option<Duration>>,
    lock_log: Mutex<Vec<PocketId>>,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
}

impl Controls {
    fn should_fail(&self, point: FailPoint) -> bool {
        *self.fail_at.lock().unwrap() == Some(point)
    }

    fn injected(&self, point: FailPoint) -> Result<(), StoreError> {
        if self.should_fail(point) {
            Err(StoreError::Backend(format!("injected failure at {:?}", point)))
        } else {
            Ok(())
        }
    }
}

#[derive(Clone, Default)]
pub struct MockLedgerStore {
    state: Arc<AsyncMutex<LedgerState>>,
    controls: Arc<Controls>,
}

impl MockLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn committed(&self) -> tokio::sync::MutexGuard<'_, LedgerState> {
        self.state
            .try_lock()
            .expect("mock ledger inspected while a transaction is open")
    }

    /// Create an account with its pocket; pocket ids ascend in creation order
    pub fn add_account(&self, username: &str, balance: Decimal) -> PocketId {
        let mut state = self.committed();
        state.next_pocket += 1;
        let id = PocketId(state.next_pocket);
        state.pockets_by_user.insert(username.to_string(), id);
        state.balances.insert(id, balance);
        id
    }

    /// Record a committed entry directly, without touching balances
    pub fn record_entry(&self, sender: &str, receiver: &str, amount: Decimal, key: &str) {
        let mut state = self.committed();
        let sender = state.pockets_by_user[sender];
        let receiver = state.pockets_by_user[receiver];
        state.next_entry += 1;
        let id = state.next_entry;
        state.entries.push(LedgerRow {
            id,
            sender,
            receiver,
            amount,
            idempotency_key: key.to_string(),
        });
    }

    pub fn balance(&self, username: &str) -> Decimal {
        let state = self.committed();
        let pocket = state.pockets_by_user[username];
        state.balances[&pocket]
    }

    pub fn entries(&self) -> Vec<LedgerRow> {
        self.committed().entries.clone()
    }

    pub fn fail_at(&self, point: FailPoint) {
        *self.controls.fail_at.lock().unwrap() = Some(point);
    }

    /// Make the key lookup always miss so a reused key reaches the insert
    pub fn skip_key_lookup(&self) {
        self.controls.skip_key_lookup.store(true, Ordering::SeqCst);
    }

    /// Simulate blocking on a row lock held elsewhere
    pub fn delay_locks(&self, delay: Duration) {
        *self.controls.lock_delay.lock().unwrap() = Some(delay);
    }

    /// Every pocket locked so far, in acquisition order
    pub fn lock_log(&self) -> Vec<PocketId> {
        self.controls.lock_log.lock().unwrap().clone()
    }

    pub fn commits(&self) -> usize {
        self.controls.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.controls.rollbacks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerStore for MockLedgerStore {
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError> {
        self.controls.injected(FailPoint::Begin)?;
        let guard = self.state.clone().lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(MockLedgerTx {
            guard,
            work,
            locked: HashSet::new(),
            controls: self.controls.clone(),
        }))
    }
}

pub struct MockLedgerTx {
    guard: OwnedMutexGuard<LedgerState>,
    work: LedgerState,
    locked: HashSet<PocketId>,
    controls: Arc<Controls>,
}

#[async_trait]
impl LedgerTx for MockLedgerTx {
    async fn find_entry_by_key(&mut self, key: &str) -> Result<Option<i64>, StoreError> {
        self.controls.injected(FailPoint::KeyLookup)?;
        if self.controls.skip_key_lookup.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self
            .work
            .entries
            .iter()
            .find(|e| e.idempotency_key == key)
            .map(|e| e.id))
    }

    async fn resolve_pocket(&mut self, username: &str) -> Result<Option<PocketId>, StoreError> {
        Ok(self.work.pockets_by_user.get(username).copied())
    }

    async fn lock_pocket(&mut self, pocket: PocketId) -> Result<Option<Decimal>, StoreError> {
        self.controls.injected(FailPoint::Lock)?;
        let delay = *self.controls.lock_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let Some(balance) = self.work.balances.get(&pocket).copied() else {
            return Ok(None);
        };
        self.locked.insert(pocket);
        self.controls.lock_log.lock().unwrap().push(pocket);
        Ok(Some(balance))
    }

    async fn adjust_balance(&mut self, pocket: PocketId, delta: Decimal) -> Result<(), StoreError> {
        let point = if delta.is_sign_negative() {
            FailPoint::Debit
        } else {
            FailPoint::Credit
        };
        self.controls.injected(point)?;
        if !self.locked.contains(&pocket) {
            return Err(StoreError::Backend(format!("pocket {} not locked", pocket)));
        }
        let balance = self
            .work
            .balances
            .get_mut(&pocket)
            .ok_or_else(|| StoreError::Backend(format!("pocket {} missing", pocket)))?;
        *balance = balance
            .checked_add(delta)
            .ok_or_else(|| StoreError::Backend("numeric overflow".into()))?;
        Ok(())
    }

    async fn insert_entry(&mut self, entry: &NewLedgerEntry) -> Result<i64, StoreError> {
        self.controls.injected(FailPoint::Insert)?;
        if entry.sender == entry.receiver || entry.amount <= Decimal::ZERO {
            return Err(StoreError::Backend("check constraint violated".into()));
        }
        if self
            .work
            .entries
            .iter()
            .any(|e| e.idempotency_key == entry.idempotency_key)
        {
            return Err(StoreError::UniqueViolation(
                "transactions_idempotency_key_key".into(),
            ));
        }
        self.work.next_entry += 1;
        let id = self.work.next_entry;
        self.work.entries.push(LedgerRow {
            id,
            sender: entry.sender,
            receiver: entry.receiver,
            amount: entry.amount,
            idempotency_key: entry.idempotency_key.clone(),
        });
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        this.controls.injected(FailPoint::Commit)?;
        let mut guard = this.guard;
        *guard = this.work;
        this.controls.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.controls.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
