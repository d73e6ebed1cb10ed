//! HTTP client for the user service's identity endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use msgcenter_core::config::IdentityConfig;
use msgcenter_core::error::{AppError, ErrorKind};
use msgcenter_core::result::AppResult;
use msgcenter_core::traits::{SecondaryIdentity, SecondaryIdentityResolver};

const GITEE_PROVIDER: &str = "gitee";

#[derive(Debug, Deserialize)]
struct IdentitiesResponse {
    #[serde(default)]
    identities: Vec<IdentityEntry>,
}

#[derive(Debug, Deserialize)]
struct IdentityEntry {
    provider: String,
    #[serde(default)]
    login: Option<String>,
}

/// Resolves Gitee logins through `GET {base_url}/users/{user_id}/identities`.
#[derive(Debug, Clone)]
pub struct UserServiceClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl UserServiceClient {
    /// Build a client from configuration.
    pub fn new(config: &IdentityConfig) -> AppResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(AppError::configuration("identity.base_url is not set"));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn identities_url(&self, user_id: &str) -> String {
        format!("{}/users/{}/identities", self.base_url, user_id)
    }
}

/// Pick the Gitee login out of an identities response body.
fn gitee_login(body: IdentitiesResponse) -> SecondaryIdentity {
    let login = body
        .identities
        .into_iter()
        .find(|i| i.provider.eq_ignore_ascii_case(GITEE_PROVIDER))
        .and_then(|i| i.login);
    SecondaryIdentity::from_login(login.as_deref())
}

#[async_trait]
impl SecondaryIdentityResolver for UserServiceClient {
    async fn resolve(&self, user_id: &str) -> AppResult<SecondaryIdentity> {
        let mut request = self.client.get(self.identities_url(user_id));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::IdentityUnresolved,
                format!("identity lookup for '{user_id}' failed"),
                e,
            )
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(user_id, "User service has no record");
                Ok(SecondaryIdentity::Absent)
            }
            status if status.is_success() => {
                let body: IdentitiesResponse = response.json().await.map_err(|e| {
                    AppError::with_source(
                        ErrorKind::IdentityUnresolved,
                        format!("identity lookup for '{user_id}' returned an unreadable body"),
                        e,
                    )
                })?;
                Ok(gitee_login(body))
            }
            status => Err(AppError::identity_unresolved(format!(
                "identity lookup for '{user_id}' returned {status}"
            ))),
        }
    }
}
