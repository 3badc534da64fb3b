use std::sync::Arc;

use axum::{
    body::to_bytes,
    debug_handler,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tracing::debug;
use warden_token::auth::{authenticator::WardenAuthenticator, error::AuthError};

use crate::{
    application::{
        role::{self, command::GrantRoleCommand, data::GrantedRoleData, RoleUseCase},
        Application,
    },
    server::response::{error_payload, handle_internal_server_error},
};

use self::response::PostRoleGrantResponse;

mod response;

const GRANT_BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone)]
struct RoleRouterState {
    application: Arc<Application>,
    auth: WardenAuthenticator,
    grant_role: String,
}

pub(crate) fn router(application: Arc<Application>, authenticator: WardenAuthenticator, grant_role: &str) -> Router {
    Router::new()
        .route("/", post(handle_post_role_grant))
        .with_state(RoleRouterState { application, auth: authenticator, grant_role: grant_role.to_owned() })
}

/// Privileged grant entry point. Terminal on the first applicable branch:
/// no verified caller, caller not an admin, malformed email, then the grant
/// itself. The token is checked here rather than behind a layer so every
/// rejection carries its classification code in the payload, and the body is
/// not touched before the caller's standing is settled.
#[debug_handler]
async fn handle_post_role_grant(State(state): State<RoleRouterState>, request: Request) -> Response {
    let claims = match state.auth.authenticate(&request).await {
        Ok(claims) => claims,
        Err(err @ AuthError::JwkSetFetch(_)) => return handle_internal_server_error(err).into_response(),
        Err(err) => {
            debug!(%err, "rejecting an unverified grant caller");
            return (StatusCode::UNAUTHORIZED, error_payload("UNAUTHENTICATED", "unauthorized")).into_response();
        }
    };

    if !claims.is_admin() {
        return (StatusCode::FORBIDDEN, error_payload("PERMISSION_DENIED", "forbidden")).into_response();
    }

    let Some(email) = read_email(request).await else {
        return (StatusCode::BAD_REQUEST, error_payload("INVALID_ARGUMENT", "email is invalid")).into_response();
    };

    let command = GrantRoleCommand { email, role: state.grant_role.clone() };
    match state.application.role().grant(command).await {
        Ok(data) => (StatusCode::OK, Json(PostRoleGrantResponse::from(data))).into_response(),
        Err(err) => err.into_response(),
    }
}

/// An unreadable or non-json body yields `None`, the same as a missing or
/// non-string `email` field.
async fn read_email(request: Request) -> Option<String> {
    let bytes = to_bytes(request.into_body(), GRANT_BODY_LIMIT).await.ok()?;
    let payload: Value = serde_json::from_slice(&bytes).ok()?;
    payload.get("email").and_then(Value::as_str).map(str::to_owned)
}

impl IntoResponse for role::Error {
    fn into_response(self) -> Response {
        match self {
            role::Error::InvalidEmail => {
                (StatusCode::BAD_REQUEST, error_payload("INVALID_ARGUMENT", "email is invalid")).into_response()
            }
            role::Error::ClaimsVersionConflict => (
                StatusCode::CONFLICT,
                error_payload("CLAIMS_VERSION_CONFLICT", "the claims mapping was updated concurrently"),
            )
                .into_response(),
            role::Error::Anyhow(e) => handle_internal_server_error(&*e).into_response(),
        }
    }
}

impl From<GrantedRoleData> for PostRoleGrantResponse {
    fn from(value: GrantedRoleData) -> Self {
        Self { result: format!("Request fulfilled! {} now has {} role.", value.email, value.role) }
    }
}
