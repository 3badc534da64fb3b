use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::role::{Error as RoleServiceError, RoleService};

use self::{command::GrantRoleCommand, data::GrantedRoleData};

pub mod command;
pub mod data;

#[async_trait]
pub(crate) trait RoleUseCase {
    async fn grant(&self, cmd: GrantRoleCommand) -> Result<GrantedRoleData>;
}

pub(crate) struct RoleUseCaseImpl {
    role_service: Arc<dyn RoleService + Sync + Send>,
}

impl RoleUseCaseImpl {
    pub fn new(role_service: Arc<dyn RoleService + Sync + Send>) -> Self {
        Self { role_service }
    }
}

#[async_trait]
impl RoleUseCase for RoleUseCaseImpl {
    async fn grant(&self, cmd: GrantRoleCommand) -> Result<GrantedRoleData> {
        self.role_service.grant(&cmd.email, &cmd.role).await?;

        Ok(GrantedRoleData { email: cmd.email, role: cmd.role })
    }
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error("email is invalid")]
    InvalidEmail,
    #[error("the claims mapping was updated concurrently")]
    ClaimsVersionConflict,
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl From<RoleServiceError> for Error {
    fn from(value: RoleServiceError) -> Self {
        match value {
            // an unknown user is a caller input problem, same as a malformed
            // email, not a fault of this service
            RoleServiceError::InvalidEmail | RoleServiceError::UserNotFound => Self::InvalidEmail,
            RoleServiceError::ClaimsVersionConflict => Self::ClaimsVersionConflict,
            RoleServiceError::Anyhow(e) => Self::Anyhow(e),
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
