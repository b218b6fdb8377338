//! Wallet Engine - authenticated, exactly-once pocket transfers
//!
//! # Modules
//!
//! - [`transfer`] - Transfer core: idempotency guard, balance locker, executor
//! - [`auth`] - Bearer token issuance and the auth gate
//! - [`account`] - Registration, login and balance lookup
//! - [`gateway`] - HTTP routes (axum)
//! - [`db`] - PostgreSQL pool and migrations
//! - [`money`] - Decimal amount parsing and formatting
//! - [`config`] - YAML configuration with env overrides
//! - [`logging`] - tracing subscriber setup

pub mod account;
pub mod auth;
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod money;
pub mod transfer;

// Convenient re-exports at crate root
pub use account::{AccountError, AccountService};
pub use auth::{CredentialVerifier, JwtAuthority, Principal};
pub use config::AppConfig;
pub use db::Database;
pub use transfer::{
    PgLedgerStore, TransferError, TransferReceipt, TransferRequest, TransferService,
};
