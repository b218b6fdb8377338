//! `POST /process` handler

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};

use crate::auth::Principal;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ErrorBody};
use crate::transfer::{TransferError, TransferRequest, TransferResponse};

/// Move funds from the caller's pocket to another pocket
///
/// The body's `sender` must equal the authenticated principal. The
/// `idempotency_key` is single use: any second request carrying it is
/// rejected with 409 and changes nothing.
#[utoipa::path(
    post,
    path = "/process",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer committed", body = TransferResponse),
        (status = 400, description = "Malformed input, invalid amount, self transfer or insufficient funds", body = ErrorBody),
        (status = 401, description = "Invalid token", body = ErrorBody),
        (status = 403, description = "No token, or sender is not the caller", body = ErrorBody),
        (status = 404, description = "Sender or receiver not found", body = ErrorBody),
        (status = 409, description = "Idempotency key already used", body = ErrorBody),
        (status = 500, description = "Storage or commit failure", body = ErrorBody),
        (status = 503, description = "Timed out before commit", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Transfer"
)]
pub async fn process_transfer(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::warn!(principal = %principal.username, error = %rejection.body_text(), "Malformed transfer body");
        TransferError::MalformedInput(rejection.body_text())
    })?;

    let receipt = state.transfers.execute(&principal, &req).await?;
    Ok(Json(TransferResponse::from(&receipt)))
}
