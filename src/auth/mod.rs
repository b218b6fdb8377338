//! Auth Gate
//!
//! Turns an inbound bearer credential into an authenticated [`Principal`].
//!
//! - [`token`]: HS256 token issuance and the [`CredentialVerifier`] seam
//! - [`middleware`]: axum middleware injecting the principal into extensions
//! - [`error`]: missing vs invalid credential errors

pub mod error;
pub mod middleware;
pub mod token;

pub use error::{AuthError, AuthErrorCode};
pub use middleware::{auth_gate, extract_credential};
pub use token::{Claims, CredentialVerifier, JwtAuthority, Principal};
