//! Account management
//!
//! PostgreSQL-backed registration, login and balance lookup. Each account
//! owns exactly one pocket, created in the same transaction.

pub mod error;
pub mod service;
pub mod validation;

pub use error::AccountError;
pub use service::{
    AccountService, CredentialsRequest, LoginResponse, PocketBalance, RegisteredAccount,
};
pub use validation::{Username, ValidationError};
