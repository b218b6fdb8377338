use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use utoipa::ToSchema;

use super::error::AccountError;
use super::validation::{Username, validate_password};
use crate::auth::JwtAuthority;

/// Registration / login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Balance of the caller's pocket
#[derive(Debug, Serialize, ToSchema)]
pub struct PocketBalance {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(value_type = String, example = "10000.00")]
    pub balance: Decimal,
}

/// Identifiers created by a registration
#[derive(Debug, Clone, Copy)]
pub struct RegisteredAccount {
    pub account_id: i64,
    pub pocket_id: i64,
}

pub fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AccountError::Hashing(e.to_string()))
}

pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), AccountError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| {
        tracing::error!(error = %e, "Stored password hash is malformed");
        AccountError::InvalidCredentials
    })?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AccountError::InvalidCredentials)
}

pub struct AccountService {
    db: PgPool,
    tokens: Arc<JwtAuthority>,
    initial_balance: Decimal,
}

impl AccountService {
    pub fn new(db: PgPool, tokens: Arc<JwtAuthority>, initial_balance: Decimal) -> Self {
        Self {
            db,
            tokens,
            initial_balance,
        }
    }

    /// Create an account and its pocket in one transaction
    pub async fn register(&self, req: CredentialsRequest) -> Result<RegisteredAccount, AccountError> {
        let username = Username::new(&req.username)?;
        validate_password(&req.password)?;
        let password_hash = hash_password(&req.password)?;

        let mut tx = self.db.begin().await?;

        let account_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO accounts (username, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(username.as_str())
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await?;

        let pocket_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO pockets (account_id, balance) VALUES ($1, $2) RETURNING id",
        )
        .bind(account_id)
        .bind(self.initial_balance)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(username = %username, account_id, pocket_id, "Account registered");
        Ok(RegisteredAccount {
            account_id,
            pocket_id,
        })
    }

    /// Verify credentials and issue a bearer token
    pub async fn login(&self, req: CredentialsRequest) -> Result<LoginResponse, AccountError> {
        let row = sqlx::query("SELECT username, password_hash FROM accounts WHERE username = $1")
            .bind(req.username.trim())
            .fetch_optional(&self.db)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        let username: String = row.try_get("username")?;
        let password_hash: String = row.try_get("password_hash")?;
        verify_password(&req.password, &password_hash)?;

        let token = self
            .tokens
            .issue(&username)
            .map_err(|e| AccountError::Token(e.to_string()))?;

        tracing::info!(username = %username, "Login succeeded");
        Ok(LoginResponse { token })
    }

    pub async fn pocket_balance(&self, username: &str) -> Result<PocketBalance, AccountError> {
        let balance = sqlx::query_scalar::<_, Decimal>(
            "SELECT p.balance FROM pockets p
             JOIN accounts a ON a.id = p.account_id
             WHERE a.username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AccountError::NotFound)?;

        Ok(PocketBalance {
            username: username.to_string(),
            balance,
        })
    }
}
