//! Wallet Engine server
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────────────┐    ┌────────────┐
//! │  Config  │───▶│ Postgres │───▶│ Transfer/Account │───▶│  Gateway   │
//! │  (YAML)  │    │ (+migr.) │    │    services      │    │  (axum)    │
//! └──────────┘    └──────────┘    └──────────────────┘    └────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use wallet_engine::account::AccountService;
use wallet_engine::auth::JwtAuthority;
use wallet_engine::config::AppConfig;
use wallet_engine::db::Database;
use wallet_engine::gateway::{self, state::AppState};
use wallet_engine::transfer::{PgLedgerStore, TransferService};

#[derive(Parser, Debug)]
#[command(name = "wallet_engine", version, about = "Pocket-to-pocket transfer service")]
struct Args {
    /// Config environment; loads config/<env>.yaml
    #[arg(short, long, default_value = "dev", env = "WALLET_ENV")]
    env: String,

    /// Override gateway.port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut app_config = AppConfig::load(&args.env)?;
    if let Some(port) = args.port {
        app_config.gateway.port = port;
    }
    let _log_guard = wallet_engine::logging::init_logging(&app_config)?;

    tracing::info!(
        env = %args.env,
        git_hash = env!("GIT_HASH"),
        "Starting wallet engine"
    );

    let db = Arc::new(
        Database::connect(&app_config.postgres)
            .await
            .context("Failed to connect to PostgreSQL")?,
    );
    if app_config.postgres.run_migrations {
        db.migrate().await.context("Failed to run migrations")?;
    }

    let authority = Arc::new(JwtAuthority::from_config(&app_config.auth));
    let ledger = Arc::new(PgLedgerStore::new(db.pool().clone()));
    let transfers = Arc::new(TransferService::new(
        ledger,
        app_config.transfer.timeout(),
    ));
    let accounts = Arc::new(AccountService::new(
        db.pool().clone(),
        authority.clone(),
        app_config.accounts.initial_balance,
    ));

    let state = AppState::new(authority, transfers)
        .with_accounts(accounts)
        .with_database(db);

    gateway::run_server(&app_config.gateway, Arc::new(state)).await
}
