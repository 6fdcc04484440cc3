//! # Bunch Gateway Crate
//!
//! HTTP REST layer for Bunch. Routes requests to the account service and the
//! group repository and maps their errors onto status codes.
//!
//! ## Architecture
//!
//! - **REST**: account and group endpoints with OpenAPI documentation
//! - **State**: shared services handed to every handler
//! - **Middleware**: CORS, request logging and tracing
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bunch_gateway::{create_router, rest::default_registry, GatewayState};
//!
//! # async fn run(pool: sqlx::SqlitePool) -> std::io::Result<()> {
//! let state = GatewayState::new(pool, Default::default());
//! let app = create_router(state, &default_registry());
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await
//! # }
//! ```

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;

pub use error::{ErrorResponse, GatewayError, GatewayResult};
pub use rest::{default_registry, ResourceRegistry};
pub use state::{create_test_gateway_state, GatewayState};

use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Create the main application router from the registered resources
pub fn create_router(state: GatewayState, registry: &ResourceRegistry) -> Router {
    let arc_state = Arc::new(state);

    #[allow(unused_mut)]
    let mut router = Router::new()
        .merge(registry.routes())
        .route("/health", get(rest::health::health_check))
        .with_state(arc_state);

    // Add Swagger UI if in debug mode
    #[cfg(debug_assertions)]
    {
        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    router
        .layer(middleware::create_cors_middleware())
        .layer(middleware::create_trace_middleware())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}

#[cfg(debug_assertions)]
#[derive(OpenApi)]
#[openapi(
    paths(
        rest::users::list_accounts,
        rest::users::create_account,
        rest::users::get_account,
        rest::users::update_account,
        rest::users::patch_account,
        rest::groups::list_groups,
        rest::groups::get_group,
        rest::health::health_check,
    ),
    components(
        schemas(
            rest::users::AccountResponse,
            rest::users::CreateAccountRequest,
            rest::users::UpdateAccountRequest,
            rest::users::ListAccountsQuery,
            rest::groups::GroupResponse,
            rest::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "Accounts", description = "Account management"),
        (name = "Groups", description = "Account groups"),
        (name = "Health", description = "Service health"),
    )
)]
struct ApiDoc;
