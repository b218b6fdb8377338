//! Account handlers: registration, login and balance query

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::account::{AccountService, CredentialsRequest, LoginResponse, PocketBalance};
use crate::auth::Principal;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ErrorBody};

/// Registration response
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "success")]
    pub status: String,
    #[schema(example = "Account alice registered")]
    pub message: String,
}

fn account_service(state: &AppState) -> Result<&Arc<AccountService>, ApiError> {
    state
        .accounts
        .as_ref()
        .ok_or_else(|| ApiError::unavailable("Account service"))
}

fn credentials(
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<CredentialsRequest, ApiError> {
    payload.map(|Json(req)| req).map_err(|rejection| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "MALFORMED_INPUT",
            rejection.body_text(),
        )
    })
}

/// Register a new account with a funded pocket
#[utoipa::path(
    post,
    path = "/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account registered", body = RegisterResponse),
        (status = 400, description = "Invalid username or password", body = ErrorBody),
        (status = 409, description = "Username already exists", body = ErrorBody),
        (status = 503, description = "Account service unavailable", body = ErrorBody)
    ),
    tag = "Account"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let accounts = account_service(&state)?;
    let req = credentials(payload)?;
    let username = req.username.trim().to_string();

    accounts.register(req).await.map_err(|e| {
        tracing::warn!(username = %username, error = %e, "Registration failed");
        ApiError::from(e)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            status: "success".to_string(),
            message: format!("Account {username} registered"),
        }),
    ))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 503, description = "Account service unavailable", body = ErrorBody)
    ),
    tag = "Account"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let accounts = account_service(&state)?;
    let req = credentials(payload)?;
    let username = req.username.trim().to_string();

    let resp = accounts.login(req).await.map_err(|e| {
        tracing::warn!(username = %username, error = %e, "Login failed");
        ApiError::from(e)
    })?;
    Ok(Json(resp))
}

/// Balance of the caller's own pocket
#[utoipa::path(
    get,
    path = "/pocket",
    responses(
        (status = 200, description = "Current balance", body = PocketBalance),
        (status = 401, description = "Invalid token", body = ErrorBody),
        (status = 403, description = "No token", body = ErrorBody),
        (status = 404, description = "No pocket for this user", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn get_pocket(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<PocketBalance>, ApiError> {
    let accounts = account_service(&state)?;
    let balance = accounts.pocket_balance(&principal.username).await?;
    Ok(Json(balance))
}
