//! Bearer token issuance and verification (HS256 JWT)

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use crate::config::AuthConfig;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub username: String,
    pub exp: usize,
    pub iat: usize,
}

/// Authenticated identity extracted from a verified credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
}

impl Principal {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Verifies a raw credential and yields its principal.
///
/// Fails closed: anything short of a verified token with a non-empty
/// principal is an `InvalidToken` error.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, credential: &str) -> Result<Principal, AuthError>;
}

/// Issues and verifies tokens signed with a process-start secret
pub struct JwtAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: u64,
}

impl JwtAuthority {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_secs)
    }

    /// Issue a token for `username` valid for the configured TTL
    pub fn issue(&self, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            username: username.to_string(),
            exp: now + self.ttl_secs as usize,
            iat: now,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }
}

impl CredentialVerifier for JwtAuthority {
    fn verify(&self, credential: &str) -> Result<Principal, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(credential, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                AuthError::invalid()
            })?;

        let username = token_data.claims.username.trim();
        if username.is_empty() {
            return Err(AuthError::invalid());
        }
        Ok(Principal::new(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::error::AuthErrorCode;

    fn sign(secret: &str, claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let authority = JwtAuthority::new("secret", 60);
        let token = authority.issue("alice").unwrap();
        let principal = authority.verify(&token).unwrap();
        assert_eq!(principal, Principal::new("alice"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtAuthority::new("secret-a", 60);
        let verifier = JwtAuthority::new("secret-b", 60);
        let token = issuer.issue("alice").unwrap();
        let err = verifier.verify(&token).unwrap_err();
        assert_eq!(err.code, AuthErrorCode::InvalidToken);
    }

    #[test]
    fn test_garbage_rejected() {
        let authority = JwtAuthority::new("secret", 60);
        assert!(authority.verify("not-a-jwt").is_err());
        assert!(authority.verify("").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp() as usize;
        let token = sign(
            "secret",
            &Claims {
                username: "alice".into(),
                exp: now - 3600,
                iat: now - 7200,
            },
        );
        let authority = JwtAuthority::new("secret", 60);
        assert!(authority.verify(&token).is_err());
    }

    #[test]
    fn test_empty_principal_rejected() {
        let now = Utc::now().timestamp() as usize;
        let token = sign(
            "secret",
            &Claims {
                username: "  ".into(),
                exp: now + 60,
                iat: now,
            },
        );
        let authority = JwtAuthority::new("secret", 60);
        assert_eq!(
            authority.verify(&token).unwrap_err().code,
            AuthErrorCode::InvalidToken
        );
    }

    #[test]
    fn test_missing_username_claim_rejected() {
        #[derive(Serialize)]
        struct NoUser {
            exp: usize,
        }
        let now = Utc::now().timestamp() as usize;
        let token = encode(
            &Header::default(),
            &NoUser { exp: now + 60 },
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        let authority = JwtAuthority::new("secret", 60);
        assert!(authority.verify(&token).is_err());
    }
}
