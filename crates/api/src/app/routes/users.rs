//! Account routes: registration and login (the only unauthenticated
//! endpoints besides the health probe).

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use souk_auth::{NewUser, Role, hash_password, verify_password};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let role = match body.role.as_deref() {
        None | Some("") => Role::Customer,
        Some(raw) => match raw.parse::<Role>() {
            Ok(role) => role,
            Err(_) => return errors::validation_error("invalid role specified"),
        },
    };

    if let Err(e) = NewUser::validate(&body.name, &body.email, &body.password) {
        return errors::validation_error(e.to_string());
    }

    let password_hash = match hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "password hashing failed");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "failed to register user",
            );
        }
    };

    let new_user = NewUser {
        name: body.name,
        email: body.email,
        password_hash,
        role,
    };

    match services.db().users().insert(new_user).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, role = %user.role, "user registered");
            (
                StatusCode::CREATED,
                Json(serde_json::json!({ "message": "user registered successfully" })),
            )
                .into_response()
        }
        Err(souk_store::StoreError::UniqueViolation { .. }) => errors::json_error(
            StatusCode::CONFLICT,
            "conflict",
            "user with this email already exists",
        ),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let user = match services.db().users().find_by_email(&body.email).await {
        Ok(Some(user)) => user,
        Ok(None) => return errors::authentication_error("invalid credentials"),
        Err(e) => return errors::store_error_to_response(e),
    };

    match verify_password(&body.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => return errors::authentication_error("invalid credentials"),
        Err(e) => {
            tracing::error!(user_id = %user.id, error = %e, "stored password hash unreadable");
            return errors::authentication_error("invalid credentials");
        }
    }

    match services.tokens().issue(&user) {
        Ok(token) => (StatusCode::OK, Json(serde_json::json!({ "token": token }))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "token issuance failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "failed to generate token",
            )
        }
    }
}
