use axum::http::StatusCode;
use thiserror::Error;

use super::validation::ValidationError;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("User already exists")]
    UsernameTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    NotFound,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AccountError {
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::Validation(_) => "MALFORMED_INPUT",
            AccountError::UsernameTaken => "USERNAME_TAKEN",
            AccountError::InvalidCredentials => "INVALID_CREDENTIALS",
            AccountError::NotFound => "NOT_FOUND",
            AccountError::Hashing(_) | AccountError::Token(_) => "INTERNAL_ERROR",
            AccountError::Database(_) => "STORAGE_ERROR",
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            AccountError::Validation(_) => StatusCode::BAD_REQUEST,
            AccountError::UsernameTaken => StatusCode::CONFLICT,
            AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AccountError::NotFound => StatusCode::NOT_FOUND,
            AccountError::Hashing(_) | AccountError::Token(_) | AccountError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            AccountError::Hashing(_) | AccountError::Token(_) | AccountError::Database(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for AccountError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AccountError::UsernameTaken;
            }
        }
        AccountError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status() {
        assert_eq!(AccountError::UsernameTaken.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            AccountError::InvalidCredentials.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AccountError::NotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AccountError::Database("password authentication failed".into());
        assert_eq!(err.public_message(), "Internal server error");
        let err: AccountError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.code(), "STORAGE_ERROR");
    }
}
