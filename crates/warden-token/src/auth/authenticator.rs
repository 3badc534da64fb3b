use std::sync::Arc;

use axum::extract::Request;
use bon::Builder;

use crate::{claim::RoleClaims, jwt::Jwt};

use super::{
    error::AuthError,
    extractor::{AuthHeaderTokenExtractor, TokenExtractor},
    jwks_discovery::JwksDiscovery,
};

/// Verifies bearer tokens against a JWKS and parses the verified payload
/// into the caller's `RoleClaims`. Shared by the request guards and by
/// handlers that answer authentication failures themselves.
#[derive(Builder, Clone)]
pub struct WardenAuthenticator {
    pub jwk_discovery: Arc<dyn JwksDiscovery + Send + Sync>,

    #[builder(default = Arc::new(AuthHeaderTokenExtractor))]
    pub token_extractor: Arc<dyn TokenExtractor + Send + Sync>,
}

impl WardenAuthenticator {
    pub async fn validate_token(&self, token: &str) -> Result<Jwt, AuthError> {
        let jwks = self.jwk_discovery.jwks().await?;
        let jwt = Jwt::decode_without_verification(token).map_err(AuthError::DecodeJwt)?;
        let jwk = jwks.get(jwt.kid()).ok_or(AuthError::NoMatchingJwk)?;
        jwt.verify(jwk).map_err(AuthError::VerifyJwt)?;
        match jwt.is_expired() {
            true => Err(AuthError::ExpiredJwt),
            false => Ok(jwt),
        }
    }

    pub fn authenticate(
        &self,
        request: &Request,
    ) -> impl std::future::Future<Output = Result<RoleClaims, AuthError>> + Send + 'static {
        let token = self.token_extractor.extract(request).map(|token| token.into_owned());
        let this = self.clone();
        async move {
            let jwt = this.validate_token(&token?).await?;
            RoleClaims::try_from(jwt.payload()).map_err(AuthError::ParseClaim)
        }
    }
}
