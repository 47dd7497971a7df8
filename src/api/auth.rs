use std::fmt;
use std::time::Duration;

use super::constants::{self, headers};
use crate::error::{SyncError, SyncResult, excerpt};

/// Client credentials for the OAuth2 client-credentials grant
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Opaque bearer token. Fetched once per run, never refreshed.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Exchanges client credentials for a Graph bearer token
pub struct AuthManager {
    http_client: reqwest::Client,
    login_base: String,
}

impl AuthManager {
    /// Create a manager against the given authority host
    pub fn new(login_base: impl Into<String>) -> SyncResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(40))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(headers::USER_AGENT)
            .build()?;

        Ok(Self {
            http_client,
            login_base: login_base.into(),
        })
    }

    /// Request a token with the client-credentials grant.
    ///
    /// Not retried: a rejected credential does not become valid by waiting.
    pub async fn authenticate(&self, credentials: &Credentials) -> SyncResult<AccessToken> {
        let token_url = constants::token_endpoint(&self.login_base, &credentials.tenant_id);

        log::info!("Requesting Graph token for tenant {}", credentials.tenant_id);

        let response = self
            .http_client
            .post(&token_url)
            .form(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("grant_type", constants::GRANT_TYPE_CLIENT_CREDENTIALS),
                ("scope", constants::GRAPH_DEFAULT_SCOPE),
            ])
            .send()
            .await?;

        let status = response.status();
        log::debug!("Token request status: {}", status);

        if status != reqwest::StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SyncError::TokenRequest {
                status: status.as_u16(),
                body: excerpt(&error_text, constants::TOKEN_ERROR_EXCERPT),
            });
        }

        let token_data: serde_json::Value = response.json().await?;

        match token_data.get("access_token").and_then(|t| t.as_str()) {
            Some(access_token) if !access_token.is_empty() => {
                log::info!("Graph token acquired");
                Ok(AccessToken::new(access_token))
            }
            _ => Err(SyncError::MissingAccessToken),
        }
    }
}
