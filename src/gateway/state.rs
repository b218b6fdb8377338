use std::sync::Arc;

use crate::account::AccountService;
use crate::auth::CredentialVerifier;
use crate::db::Database;
use crate::transfer::TransferService;

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    /// Credential verifier used by the auth gate
    pub verifier: Arc<dyn CredentialVerifier>,
    /// Transfer core
    pub transfers: Arc<TransferService>,
    /// Registration / login / balance (PostgreSQL only)
    pub accounts: Option<Arc<AccountService>>,
    /// Pool handle for health checks
    pub db: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, transfers: Arc<TransferService>) -> Self {
        Self {
            verifier,
            transfers,
            accounts: None,
            db: None,
        }
    }

    pub fn with_accounts(mut self, accounts: Arc<AccountService>) -> Self {
        self.accounts = Some(accounts);
        self
    }

    pub fn with_database(mut self, db: Arc<Database>) -> Self {
        self.db = Some(db);
        self
    }
}
