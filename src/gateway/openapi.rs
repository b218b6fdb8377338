//! OpenAPI Documentation
//!
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::account::{CredentialsRequest, LoginResponse, PocketBalance};
use crate::gateway::handlers::{HealthResponse, RegisterResponse};
use crate::gateway::types::ErrorBody;
use crate::transfer::{TransferRequest, TransferResponse};

/// HS256 bearer token security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let scheme = HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .build();
            components.add_security_scheme("bearer_auth", SecurityScheme::Http(scheme));
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wallet Engine API",
        version = "1.0.0",
        description = "Authenticated, exactly-once pocket-to-pocket transfers."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::account::register,
        crate::gateway::handlers::account::login,
        crate::gateway::handlers::account::get_pocket,
        crate::gateway::handlers::transfer::process_transfer,
    ),
    components(
        schemas(
            ErrorBody,
            HealthResponse,
            RegisterResponse,
            CredentialsRequest,
            LoginResponse,
            PocketBalance,
            TransferRequest,
            TransferResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "System", description = "Health check"),
        (name = "Account", description = "Registration, login and balance"),
        (name = "Transfer", description = "Pocket-to-pocket transfers")
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
