use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use souk_auth::{Role, TokenVerifier};

use crate::app::errors::{authentication_error, authorization_error};
use crate::context::Principal;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Authenticate the request: extract the bearer credential, verify it, and
/// install a typed [`Principal`] extension for downstream layers/handlers.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Some(token) => token,
        None => return authentication_error("missing bearer credential"),
    };

    let claims = match state.verifier.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "token verification failed");
            return authentication_error("invalid credentials");
        }
    };

    req.extensions_mut()
        .insert(Principal::new(claims.sub, claims.email, claims.role));

    next.run(req).await
}

/// Gate a route group on one role. Runs after [`auth_middleware`], so a
/// missing principal means the request bypassed authentication.
pub async fn require_role(
    State(required): State<Role>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(principal) = req.extensions().get::<Principal>() else {
        return authentication_error("missing bearer credential");
    };

    if principal.role() != required {
        return authorization_error("insufficient permissions");
    }

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}
