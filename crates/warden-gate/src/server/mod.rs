use std::{sync::Arc, time::Duration};

use axum::{routing::get, Router};
use tracing::debug;
use url::Url;
use warden_token::auth::{authenticator::WardenAuthenticator, jwks_discovery::CachedRemoteJwksDiscovery};

use crate::{application::Application, config::ApplicationConfig};

mod response;
mod router;

const DEFAULT_JWKS_REFRESH_INTERVAL_SECONDS: u64 = 300;

pub(super) struct ServerConfig {
    pub port: u16,
    pub jwks_url: Url,
    pub jwks_refresh_interval: Option<u64>,
    pub grant_role: String,
    pub gate_role: String,
}

impl From<&ApplicationConfig> for ServerConfig {
    fn from(value: &ApplicationConfig) -> Self {
        Self {
            port: value.port,
            jwks_url: value.jwks_url.clone(),
            jwks_refresh_interval: value.jwks_refresh_interval,
            grant_role: value.grant.role.clone(),
            gate_role: value.gate.role.clone(),
        }
    }
}

pub(super) async fn run(application: Application, config: ServerConfig) -> anyhow::Result<()> {
    let jwk_discovery = Arc::new(CachedRemoteJwksDiscovery::new(
        config.jwks_url.clone(),
        Duration::from_secs(config.jwks_refresh_interval.unwrap_or(DEFAULT_JWKS_REFRESH_INTERVAL_SECONDS)),
    ));
    let authenticator = WardenAuthenticator::builder().jwk_discovery(jwk_discovery).build();

    let app = router(Arc::new(application), authenticator, &config);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    debug!("starting gate server on {}", config.port);
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(application: Arc<Application>, authenticator: WardenAuthenticator, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(|| async { "" }))
        .nest("/roles", router::role::router(application, authenticator.clone(), &config.grant_role))
        .merge(router::gate::router(authenticator, &config.gate_role))
}
