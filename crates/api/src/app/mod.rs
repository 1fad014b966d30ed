//! HTTP API application wiring (axum router + service wiring).
//!
//! Folder layout:
//! - `services.rs`: dependency wiring (store handle, token codec)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use souk_auth::Hs256TokenCodec;
use souk_store::Database;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(db: Database, jwt_secret: &str) -> Router {
    let tokens = Arc::new(Hs256TokenCodec::new(jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState {
        verifier: tokens.clone(),
    };

    let services = Arc::new(services::AppServices::new(db, tokens));

    // Protected routes: require a verified bearer credential; each group is
    // additionally gated on its role.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/users", routes::users::router())
        .merge(protected)
        .layer(Extension(services))
        .layer(ServiceBuilder::new())
}
