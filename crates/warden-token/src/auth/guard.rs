//! Request guards composable in front of a handler. Each guard either
//! short-circuits with a terminal status or forwards to the wrapped service,
//! so a gated route reads outer-to-inner as `method(role(handler))`.

use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode},
    response::IntoResponse,
};
use futures_util::future::BoxFuture;
use tower::Layer;

use super::{authenticator::WardenAuthenticator, error::AuthError};

#[derive(Clone)]
pub struct MethodGuardLayer {
    method: Method,
}

impl MethodGuardLayer {
    pub fn new(method: Method) -> Self {
        Self { method }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }
}

impl<S> Layer<S> for MethodGuardLayer {
    type Service = MethodGuardService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MethodGuardService { inner, method: self.method.clone() }
    }
}

#[derive(Clone)]
pub struct MethodGuardService<S> {
    inner: S,
    method: Method,
}

impl<S> tower::Service<Request<Body>> for MethodGuardService<S>
where
    S: tower::Service<Request<Body>, Response = axum::response::Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        if request.method() != self.method {
            return Box::pin(async { Ok(StatusCode::METHOD_NOT_ALLOWED.into_response()) });
        }
        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(request).await })
    }
}

#[derive(Clone)]
pub struct RoleGuardLayer {
    auth: WardenAuthenticator,
    role: String,
}

impl RoleGuardLayer {
    pub fn new(auth: WardenAuthenticator, role: impl Into<String>) -> Self {
        Self { auth, role: role.into() }
    }
}

impl<S> Layer<S> for RoleGuardLayer {
    type Service = RoleGuardService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RoleGuardService { inner, auth: self.auth.clone(), role: self.role.clone() }
    }
}

#[derive(Clone)]
pub struct RoleGuardService<S> {
    inner: S,
    auth: WardenAuthenticator,
    role: String,
}

impl<S> tower::Service<Request<Body>> for RoleGuardService<S>
where
    S: tower::Service<Request<Body>, Response = axum::response::Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();
        let auth = self.auth.clone();
        let role = self.role.clone();
        Box::pin(async move {
            let claims = match auth.authenticate(&request).await {
                Ok(claims) => claims,
                Err(err) => return Ok(err.into_response()),
            };

            if !claims.has_role(&role) {
                return Ok(AuthError::MissingRole(role).into_response());
            }

            request.extensions_mut().insert(claims);
            inner.call(request).await
        })
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::{Duration, SystemTime};

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::any,
        Router,
    };
    use josekit::{jwk::Jwk, jws::JwsHeader, jwt::JwtPayload};
    use serde_json::Value;
    use tower::{ServiceBuilder, ServiceExt};

    use crate::{
        auth::{authenticator::WardenAuthenticator, jwks_discovery::StaticJwksDiscovery},
        jwk::jwk_set::JwkSet,
        jwt::Jwt,
    };

    use super::{MethodGuardLayer, RoleGuardLayer};

    fn signing_jwk() -> Jwk {
        let mut jwk = Jwk::generate_oct_key(32).expect("generating an oct key should be successful");
        jwk.set_algorithm("HS256");
        jwk.set_key_id("test-key");
        jwk
    }

    fn authenticator(jwk: &Jwk) -> WardenAuthenticator {
        WardenAuthenticator::builder()
            .jwk_discovery(Arc::new(StaticJwksDiscovery::new(JwkSet::new(vec![jwk.clone()]))))
            .build()
    }

    fn signed_token(jwk: &Jwk, roles: &[&str], expires_in: Duration) -> String {
        let mut header = JwsHeader::new();
        header.set_token_type("JWT");
        header.set_key_id("test-key");

        let mut payload = JwtPayload::new();
        payload.set_subject("user-1");
        payload.set_expires_at(&(SystemTime::now() + expires_in));
        for role in roles {
            payload.set_claim(role, Some(Value::Bool(true))).expect("setting a claim should be successful");
        }

        Jwt::new(header, payload, jwk).expect("signing should be successful").serialized_repr
    }

    fn gated_router(jwk: &Jwk) -> Router {
        Router::new().route(
            "/agent",
            any(|| async { "ok" }).layer(
                ServiceBuilder::new()
                    .layer(MethodGuardLayer::get())
                    .layer(RoleGuardLayer::new(authenticator(jwk), "agent")),
            ),
        )
    }

    fn get_request(token: Option<&str>) -> Request<Body> {
        let builder = Request::builder().method("GET").uri("/agent");
        let builder = match token {
            Some(token) => builder.header("authorization", format!("Bearer {token}")),
            None => builder,
        };
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn a_non_get_request_is_rejected_with_405_before_any_token_handling() {
        let jwk = signing_jwk();
        let request = Request::builder().method("POST").uri("/agent").body(Body::empty()).unwrap();

        let response = gated_router(&jwk).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn a_request_without_an_authorization_header_is_rejected_with_401() {
        let jwk = signing_jwk();

        let response = gated_router(&jwk).oneshot(get_request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn an_unverifiable_token_is_rejected_with_401() {
        let jwk = signing_jwk();
        let other_jwk = signing_jwk();
        let token = signed_token(&other_jwk, &["agent"], Duration::from_secs(60));

        let response = gated_router(&jwk).oneshot(get_request(Some(&token))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn an_expired_token_is_rejected_with_401() {
        let jwk = signing_jwk();
        let token = signed_token(&jwk, &["agent"], Duration::from_secs(0));

        let response = gated_router(&jwk).oneshot(get_request(Some(&token))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn a_verified_token_without_the_role_is_rejected_with_403() {
        let jwk = signing_jwk();
        let token = signed_token(&jwk, &["admin"], Duration::from_secs(60));

        let response = gated_router(&jwk).oneshot(get_request(Some(&token))).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn a_verified_token_with_the_role_reaches_the_handler() {
        let jwk = signing_jwk();
        let token = signed_token(&jwk, &["agent"], Duration::from_secs(60));

        let response = gated_router(&jwk).oneshot(get_request(Some(&token))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
