use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Environment variable overriding `postgres.url`
pub const ENV_POSTGRES_URL: &str = "WALLET_POSTGRES_URL";
/// Environment variable overriding `auth.jwt_secret`
pub const ENV_JWT_SECRET: &str = "WALLET_JWT_SECRET";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    pub postgres: PostgresConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PostgresConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
    #[serde(default)]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    20
}

fn default_acquire_timeout_ms() -> u64 {
    5000
}

impl PostgresConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

/// Bearer token settings. The secret is scoped to the token authority built from it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

fn default_token_ttl_secs() -> u64 {
    3600
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransferConfig {
    /// Deadline for everything that happens before commit
    pub timeout_ms: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self { timeout_ms: 5000 }
    }
}

impl TransferConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccountsConfig {
    /// Balance seeded into the pocket of a freshly registered account
    pub initial_balance: Decimal,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            initial_balance: Decimal::new(1_000_000, 2),
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml` and apply environment overrides
    pub fn load(env: &str) -> Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path))?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_POSTGRES_URL).filter(|v| !v.is_empty()) {
            self.postgres.url = url;
        }
        if let Some(secret) = lookup(ENV_JWT_SECRET).filter(|v| !v.is_empty()) {
            self.auth.jwt_secret = secret;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.postgres.url.is_empty() {
            bail!("postgres.url is empty (set {})", ENV_POSTGRES_URL);
        }
        if self.auth.jwt_secret.is_empty() {
            bail!("auth.jwt_secret is empty (set {})", ENV_JWT_SECRET);
        }
        if self.accounts.initial_balance.is_sign_negative() {
            bail!("accounts.initial_balance must not be negative");
        }
        Ok(())
    }
}
