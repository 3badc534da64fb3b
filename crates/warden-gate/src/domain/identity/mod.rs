use std::collections::HashMap;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::{header, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// A user identity as held by the external identity platform. The platform
/// owns the record; this service only reads it and writes the claims mapping
/// back.
#[derive(Debug, Clone)]
pub(crate) struct User {
    pub uid: String,
    pub email: String,
    pub custom_claims: HashMap<String, Value>,
    /// Opaque claims version from the store, when it publishes one. Carried
    /// into the write-back so a concurrent update fails instead of being
    /// silently overwritten.
    pub claims_version: Option<String>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub(crate) trait IdentityService {
    async fn get_user_by_email(&self, email: &str) -> Result<User>;
    async fn set_custom_claims(
        &self,
        uid: &str,
        version: Option<String>,
        claims: HashMap<String, Value>,
    ) -> Result<()>;
}

/// Client for the identity platform's REST admin API.
pub(crate) struct RestIdentityService {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl RestIdentityService {
    pub(crate) fn new(base_url: Url, api_key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url, api_key })
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let request = self.client.request(method, url);
        match &self.api_key {
            Some(api_key) => request.bearer_auth(api_key),
            None => request,
        }
    }
}

#[derive(Deserialize)]
struct UserResponse {
    uid: String,
    email: String,
    #[serde(default)]
    custom_claims: HashMap<String, Value>,
}

#[async_trait]
impl IdentityService for RestIdentityService {
    async fn get_user_by_email(&self, email: &str) -> Result<User> {
        let url = self.base_url.join("v1/users").map_err(anyhow::Error::from)?;
        let response =
            self.request(Method::GET, url).query(&[("email", email)]).send().await.map_err(anyhow::Error::from)?;

        match response.status() {
            StatusCode::OK => {
                let claims_version =
                    response.headers().get(header::ETAG).and_then(|value| value.to_str().ok()).map(str::to_owned);
                let body: UserResponse = response.json().await.map_err(anyhow::Error::from)?;
                Ok(User { uid: body.uid, email: body.email, custom_claims: body.custom_claims, claims_version })
            }
            StatusCode::NOT_FOUND => Err(Error::UserNotFound),
            StatusCode::BAD_REQUEST => Err(Error::InvalidEmail),
            status => Err(Error::Anyhow(anyhow!("identity store answered user lookup with status {status}"))),
        }
    }

    async fn set_custom_claims(
        &self,
        uid: &str,
        version: Option<String>,
        claims: HashMap<String, Value>,
    ) -> Result<()> {
        let url = self.base_url.join(&format!("v1/users/{uid}/claims")).map_err(anyhow::Error::from)?;
        let mut request = self.request(Method::PUT, url).json(&claims);
        if let Some(version) = version {
            request = request.header(header::IF_MATCH, version);
        }
        let response = request.send().await.map_err(anyhow::Error::from)?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(Error::UserNotFound),
            StatusCode::PRECONDITION_FAILED => Err(Error::ClaimsVersionConflict),
            status => Err(Error::Anyhow(anyhow!("identity store answered claims update with status {status}"))),
        }
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

pub(crate) type Result<T> = std::result::Result<T, Error>;
