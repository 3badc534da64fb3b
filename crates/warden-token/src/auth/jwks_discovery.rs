use std::time::{Duration, Instant};

use reqwest::IntoUrl;
use tokio::sync::RwLock;

use crate::jwk::jwk_set::JwkSet;

use super::error::AuthError;

#[async_trait::async_trait]
pub trait JwksDiscovery {
    async fn jwks(&self) -> Result<JwkSet, AuthError>;
}

pub struct StaticJwksDiscovery {
    jwks: JwkSet,
}

impl StaticJwksDiscovery {
    pub fn new(jwks: JwkSet) -> Self {
        Self { jwks }
    }
}

#[async_trait::async_trait]
impl JwksDiscovery for StaticJwksDiscovery {
    async fn jwks(&self) -> Result<JwkSet, AuthError> {
        Ok(self.jwks.clone())
    }
}

pub async fn fetch_jwks(client: &reqwest::Client, jwks_url: impl IntoUrl) -> Result<JwkSet, AuthError> {
    let response = client.get(jwks_url).send().await?;
    let jwks = response.json::<JwkSet>().await?;
    Ok(jwks)
}

/// Fetches the JWK set lazily and refreshes it once `refresh_interval` has
/// passed. A failed refresh keeps serving the previous set; verification
/// keys rotate rarely and a stale set still verifies tokens.
pub struct CachedRemoteJwksDiscovery {
    client: reqwest::Client,
    jwks_url: url::Url,
    refresh_interval: Duration,
    cache: RwLock<Option<CachedJwks>>,
}

struct CachedJwks {
    jwks: JwkSet,
    fetched_at: Instant,
}

impl CachedRemoteJwksDiscovery {
    pub fn new(jwks_url: url::Url, refresh_interval: Duration) -> Self {
        Self { client: reqwest::Client::new(), jwks_url, refresh_interval, cache: RwLock::new(None) }
    }
}

#[async_trait::async_trait]
impl JwksDiscovery for CachedRemoteJwksDiscovery {
    async fn jwks(&self) -> Result<JwkSet, AuthError> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.refresh_interval {
                return Ok(cached.jwks.clone());
            }
        }

        let mut cache = self.cache.write().await;
        // another caller may have refreshed while we waited for the write lock
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < self.refresh_interval {
                return Ok(cached.jwks.clone());
            }
        }

        match fetch_jwks(&self.client, self.jwks_url.clone()).await {
            Ok(jwks) => {
                *cache = Some(CachedJwks { jwks: jwks.clone(), fetched_at: Instant::now() });
                Ok(jwks)
            }
            Err(err) => match cache.as_ref() {
                Some(cached) => {
                    tracing::warn!(error = %err, "failed to refresh the JWK set, serving the cached one");
                    Ok(cached.jwks.clone())
                }
                None => Err(err),
            },
        }
    }
}
