use axum::Router;

use souk_auth::Role;

use crate::middleware;

pub mod catalog;
pub mod products;
pub mod system;
pub mod transactions;
pub mod users;

/// All authenticated routes, each group gated on its role.
pub fn router() -> Router {
    Router::new()
        .nest("/product/merchant", role_gated(products::router(), Role::Merchant))
        .nest("/products", role_gated(catalog::router(), Role::Customer))
        .nest(
            "/transactions/merchant",
            role_gated(transactions::merchant_router(), Role::Merchant),
        )
        .nest(
            "/transactions/customer",
            role_gated(transactions::customer_router(), Role::Customer),
        )
}

fn role_gated(router: Router, role: Role) -> Router {
    router.layer(axum::middleware::from_fn_with_state(
        role,
        middleware::require_role,
    ))
}
