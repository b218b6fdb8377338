use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::error::AuthError;
use crate::gateway::state::AppState;

/// Pull the credential out of the Authorization header.
///
/// Accepts both the raw token and `Bearer <token>`. An absent header is
/// `MissingToken`; a present but unusable one is `InvalidToken`.
pub fn extract_credential(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(AuthError::missing)?;
    let raw = value.to_str().map_err(|_| AuthError::invalid())?.trim();
    if raw.is_empty() {
        return Err(AuthError::missing());
    }

    let token = raw
        .strip_prefix("Bearer ")
        .or_else(|| raw.strip_prefix("bearer "))
        .unwrap_or(raw)
        .trim();
    if token.is_empty() {
        return Err(AuthError::invalid());
    }
    Ok(token)
}

/// Auth Gate: verify the bearer credential and inject the `Principal`
pub async fn auth_gate(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let credential = extract_credential(request.headers())?;

    match state.verifier.verify(credential) {
        Ok(principal) => {
            tracing::debug!(principal = %principal.username, "Credential verified");
            request.extensions_mut().insert(principal);
            Ok(next.run(request).await)
        }
        Err(e) => {
            tracing::warn!(path = %request.uri().path(), "Rejected invalid credential");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::error::AuthErrorCode;
    use axum::http::HeaderValue;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(v) = value {
            map.insert(header::AUTHORIZATION, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn test_missing_header() {
        let err = extract_credential(&headers(None)).unwrap_err();
        assert_eq!(err.code, AuthErrorCode::MissingToken);
    }

    #[test]
    fn test_empty_header_is_missing() {
        let err = extract_credential(&headers(Some(""))).unwrap_err();
        assert_eq!(err.code, AuthErrorCode::MissingToken);
    }

    #[test]
    fn test_raw_and_bearer_forms() {
        assert_eq!(extract_credential(&headers(Some("abc.def"))).unwrap(), "abc.def");
        assert_eq!(
            extract_credential(&headers(Some("Bearer abc.def"))).unwrap(),
            "abc.def"
        );
    }

    #[test]
    fn test_non_ascii_header_is_invalid() {
        let mut map = HeaderMap::new();
        map.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );
        let err = extract_credential(&map).unwrap_err();
        assert_eq!(err.code, AuthErrorCode::InvalidToken);
    }
}
