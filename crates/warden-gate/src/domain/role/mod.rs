use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde_json::Value;
use tracing::info;

use crate::domain::identity::{Error as IdentityServiceError, IdentityService};

#[cfg_attr(test, automock)]
#[async_trait]
pub(crate) trait RoleService {
    async fn grant(&self, email: &str, role: &str) -> Result<()>;
}

pub(crate) struct RoleServiceImpl {
    identity_service: Arc<dyn IdentityService + Sync + Send>,
}

impl RoleServiceImpl {
    pub(crate) fn new(identity_service: Arc<dyn IdentityService + Sync + Send>) -> Self {
        Self { identity_service }
    }
}

#[async_trait]
impl RoleService for RoleServiceImpl {
    /// Ensures `custom_claims[role] == true` on the identity matching the
    /// email. Read-modify-write over the whole claims mapping; other keys are
    /// carried through unchanged, and the version read here is sent with the
    /// write so a concurrent update surfaces as a conflict.
    async fn grant(&self, email: &str, role: &str) -> Result<()> {
        let user = self.identity_service.get_user_by_email(email).await?;

        if user.custom_claims.get(role).and_then(Value::as_bool) == Some(true) {
            return Ok(());
        }

        let mut claims = user.custom_claims;
        claims.insert(role.to_owned(), Value::Bool(true));
        self.identity_service.set_custom_claims(&user.uid, user.claims_version, claims).await?;

        info!("role(name: {role}) granted to user(email: {}).", user.email);

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error("email is invalid")]
    InvalidEmail,
    #[error("no user matches the email")]
    UserNotFound,
    #[error("the claims mapping was updated concurrently")]
    ClaimsVersionConflict,
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl From<IdentityServiceError> for Error {
    fn from(value: IdentityServiceError) -> Self {
        match value {
            IdentityServiceError::InvalidEmail => Self::InvalidEmail,
            IdentityServiceError::UserNotFound => Self::UserNotFound,
            IdentityServiceError::ClaimsVersionConflict => Self::ClaimsVersionConflict,
            IdentityServiceError::Anyhow(e) => Self::Anyhow(e),
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::sync::Arc;

    use serde_json::Value;

    use crate::domain::identity::{Error as IdentityServiceError, MockIdentityService, User};

    use super::{Error, RoleService, RoleServiceImpl};

    const EMAIL: &str = "agent@example.com";

    fn user_with_claims(claims: HashMap<String, Value>) -> User {
        User {
            uid: "user-1".to_owned(),
            email: EMAIL.to_owned(),
            custom_claims: claims,
            claims_version: Some("v1".to_owned()),
        }
    }

    #[tokio::test]
    async fn granting_a_role_writes_back_the_mapping_with_the_role_set() {
        let mut identity_service_mock = MockIdentityService::new();
        identity_service_mock
            .expect_get_user_by_email()
            .withf(|email| email == EMAIL)
            .times(1)
            .returning(|_| Ok(user_with_claims(HashMap::new())));
        identity_service_mock
            .expect_set_custom_claims()
            .withf(|uid, version, claims| {
                uid == "user-1"
                    && version.as_deref() == Some("v1")
                    && claims.get("agent") == Some(&Value::Bool(true))
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let role_service = RoleServiceImpl::new(Arc::new(identity_service_mock));

        role_service.grant(EMAIL, "agent").await.expect("granting should be successful");
    }

    #[tokio::test]
    async fn granting_preserves_unrelated_claim_keys() {
        let mut identity_service_mock = MockIdentityService::new();
        identity_service_mock.expect_get_user_by_email().times(1).returning(|_| {
            let mut claims = HashMap::new();
            claims.insert("staff".to_owned(), Value::Bool(true));
            claims.insert("tier".to_owned(), Value::String("gold".to_owned()));
            Ok(user_with_claims(claims))
        });
        identity_service_mock
            .expect_set_custom_claims()
            .withf(|_, _, claims| {
                claims.get("agent") == Some(&Value::Bool(true))
                    && claims.get("staff") == Some(&Value::Bool(true))
                    && claims.get("tier") == Some(&Value::String("gold".to_owned()))
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let role_service = RoleServiceImpl::new(Arc::new(identity_service_mock));

        role_service.grant(EMAIL, "agent").await.expect("granting should be successful");
    }

    #[tokio::test]
    async fn granting_an_already_held_role_is_a_no_op() {
        let mut identity_service_mock = MockIdentityService::new();
        identity_service_mock.expect_get_user_by_email().times(1).returning(|_| {
            let mut claims = HashMap::new();
            claims.insert("agent".to_owned(), Value::Bool(true));
            Ok(user_with_claims(claims))
        });
        identity_service_mock.expect_set_custom_claims().times(0);

        let role_service = RoleServiceImpl::new(Arc::new(identity_service_mock));

        role_service.grant(EMAIL, "agent").await.expect("granting should be successful");
    }

    #[tokio::test]
    async fn an_unknown_email_surfaces_as_user_not_found() {
        let mut identity_service_mock = MockIdentityService::new();
        identity_service_mock
            .expect_get_user_by_email()
            .times(1)
            .returning(|_| Err(IdentityServiceError::UserNotFound));

        let role_service = RoleServiceImpl::new(Arc::new(identity_service_mock));
        let result = role_service.grant("nobody@example.com", "agent").await;

        assert!(matches!(result, Err(Error::UserNotFound)));
    }

    #[tokio::test]
    async fn a_version_conflict_on_the_write_is_propagated() {
        let mut identity_service_mock = MockIdentityService::new();
        identity_service_mock
            .expect_get_user_by_email()
            .times(1)
            .returning(|_| Ok(user_with_claims(HashMap::new())));
        identity_service_mock
            .expect_set_custom_claims()
            .times(1)
            .returning(|_, _, _| Err(IdentityServiceError::ClaimsVersionConflict));

        let role_service = RoleServiceImpl::new(Arc::new(identity_service_mock));
        let result = role_service.grant(EMAIL, "agent").await;

        assert!(matches!(result, Err(Error::ClaimsVersionConflict)));
    }
}
