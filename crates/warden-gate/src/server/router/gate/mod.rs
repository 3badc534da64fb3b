use axum::{routing::any, Router};
use tower::ServiceBuilder;
use warden_token::auth::{
    authenticator::WardenAuthenticator,
    guard::{MethodGuardLayer, RoleGuardLayer},
};

/// The gated and unprotected example endpoints. Guards wrap the handlers
/// outer-to-inner as `method(role(handler))`, so a wrong method answers 405
/// before any token is looked at.
pub(crate) fn router(authenticator: WardenAuthenticator, gate_role: &str) -> Router {
    Router::new()
        .route(
            "/agent",
            any(handle_agent_query).layer(
                ServiceBuilder::new()
                    .layer(MethodGuardLayer::get())
                    .layer(RoleGuardLayer::new(authenticator, gate_role)),
            ),
        )
        .route("/public", any(handle_public_query).layer(MethodGuardLayer::get()))
}

async fn handle_agent_query() -> &'static str {
    "user has agent access"
}

async fn handle_public_query() -> &'static str {
    "unprotected endpoint reached successfully"
}
