use std::sync::Arc;
use std::time::Duration;

use role::{RoleUseCase, RoleUseCaseImpl};

use crate::{
    config::ApplicationConfig,
    domain::{
        identity::RestIdentityService,
        role::{RoleService, RoleServiceImpl},
    },
};

pub(crate) mod role;

const DEFAULT_IDENTITY_TIMEOUT_SECONDS: u64 = 5;

pub(crate) struct Application {
    role_service: Arc<dyn RoleService + Sync + Send>,
}

impl Application {
    pub(crate) fn new(role_service: Arc<dyn RoleService + Sync + Send>) -> Self {
        Self { role_service }
    }

    pub fn role(&self) -> impl RoleUseCase {
        RoleUseCaseImpl::new(self.role_service.clone())
    }
}

pub(super) fn init(config: &ApplicationConfig) -> anyhow::Result<Application> {
    let identity_service = Arc::new(RestIdentityService::new(
        config.identity.base_url.clone(),
        config.identity.api_key.clone(),
        Duration::from_secs(config.identity.timeout_seconds.unwrap_or(DEFAULT_IDENTITY_TIMEOUT_SECONDS)),
    )?);

    Ok(Application::new(Arc::new(RoleServiceImpl::new(identity_service))))
}
