//! PostgreSQL ledger store
//!
//! Each transaction owns a pooled connection for its whole lifetime. An
//! uncommitted `sqlx::Transaction` rolls back when dropped, which covers
//! cancelled requests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use super::store::{LedgerStore, LedgerTx, StoreError};
use super::types::{NewLedgerEntry, PocketId};

pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgLedgerTx { tx }))
    }
}

pub struct PgLedgerTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl LedgerTx for PgLedgerTx {
    async fn find_entry_by_key(&mut self, key: &str) -> Result<Option<i64>, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM transactions WHERE idempotency_key = $1",
        )
        .bind(key)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(id)
    }

    async fn resolve_pocket(&mut self, username: &str) -> Result<Option<PocketId>, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT p.id FROM pockets p
             JOIN accounts a ON a.id = p.account_id
             WHERE a.username = $1",
        )
        .bind(username)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(id.map(PocketId))
    }

    async fn lock_pocket(&mut self, pocket: PocketId) -> Result<Option<Decimal>, StoreError> {
        let balance = sqlx::query_scalar::<_, Decimal>(
            "SELECT balance FROM pockets WHERE id = $1 FOR UPDATE",
        )
        .bind(pocket.0)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(balance)
    }

    async fn adjust_balance(&mut self, pocket: PocketId, delta: Decimal) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE pockets SET balance = balance + $1 WHERE id = $2")
            .bind(delta)
            .bind(pocket.0)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() != 1 {
            return Err(StoreError::Backend(format!(
                "pocket {} update affected {} rows",
                pocket,
                result.rows_affected()
            )));
        }
        Ok(())
    }

    async fn insert_entry(&mut self, entry: &NewLedgerEntry) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO transactions (sender_id, receiver_id, amount, idempotency_key)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(entry.sender.0)
        .bind(entry.receiver.0)
        .bind(entry.amount)
        .bind(&entry.idempotency_key)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
