//! Input validation for account credentials
//!
//! Fields are private to force validation through the public API.

use std::fmt;

/// Validation errors for registration input
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid length for {field}: expected {min}-{max}, got {actual}")]
    InvalidLength {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Invalid format for {field}: '{value}' (expected: {expected})")]
    InvalidFormat {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Validated username
///
/// # Validation Rules
/// - Length: 3-32 characters
/// - Characters: `A-Z a-z 0-9 _ . -`
/// - Case is preserved; usernames compare exactly
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 32;

    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();

        if name.len() < Self::MIN_LEN || name.len() > Self::MAX_LEN {
            return Err(ValidationError::InvalidLength {
                field: "username",
                min: Self::MIN_LEN,
                max: Self::MAX_LEN,
                actual: name.len(),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(ValidationError::InvalidFormat {
                field: "username",
                value: name.to_string(),
                expected: "letters, digits, '_', '.', '-'",
            });
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(ValidationError::InvalidLength {
            field: "password",
            min: MIN_PASSWORD_LEN,
            max: MAX_PASSWORD_LEN,
            actual: len,
        });
    }
    Ok(())
}
