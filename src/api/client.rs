use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use super::auth::AccessToken;
use super::constants::{self, headers};
use super::resilience::{ApiLogger, RetryConfig, RetryPolicy, RetryableError};
use crate::error::{SyncError, SyncResult, excerpt};

/// Microsoft Graph client: the single network primitive of the sync pipeline.
///
/// Only issues GET requests. Transient statuses (429, 500, 502, 503, 504) and
/// transport failures are retried with backoff; every other non-200 status is
/// fatal on first sight.
#[derive(Clone)]
pub struct GraphClient {
    base_url: String,
    http_client: reqwest::Client,
    access_token: AccessToken,
    retry_policy: RetryPolicy,
    api_logger: ApiLogger,
}

impl GraphClient {
    /// Create a new client with custom retry policy
    pub fn with_retry_policy(
        base_url: impl Into<String>,
        access_token: AccessToken,
        retry_config: RetryConfig,
    ) -> SyncResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(headers::USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            access_token,
            retry_policy: RetryPolicy::new(retry_config),
            api_logger: ApiLogger::new(),
        })
    }

    /// Graph base URL including the API version, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a URL and deserialize the body into `T`
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> SyncResult<T> {
        let body = self.get_json(url, params).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// GET a URL with bearer auth and return the parsed JSON body.
    pub async fn get_json(&self, url: &str, params: &[(&str, &str)]) -> SyncResult<Value> {
        let context = self.api_logger.start_request("GET", url);
        let max_attempts = self.retry_policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let mut request = self
                .http_client
                .get(url)
                .bearer_auth(self.access_token.secret())
                .header(reqwest::header::ACCEPT, headers::CONTENT_TYPE_JSON);
            if !params.is_empty() {
                request = request.query(params);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(error) => {
                    let retryable = RetryableError::from_reqwest_error(&error).is_some();
                    if retryable && self.retry_policy.has_attempts_left(attempt) {
                        let wait = self.retry_policy.calculate_delay(attempt);
                        self.api_logger.log_retry(
                            &context,
                            &format!("transport error ({})", error),
                            attempt,
                            max_attempts,
                            wait,
                        );
                        tokio::time::sleep(wait).await;
                        continue;
                    }
                    self.api_logger.log_failure(&context, &error.to_string(), attempt);
                    return Err(error.into());
                }
            };

            let status = response.status().as_u16();

            if status == 200 {
                let body: Value = response.json().await?;
                self.api_logger.log_success(&context, status, attempt);
                return Ok(body);
            }

            if RetryableError::from_status_code(status).should_retry() {
                if !self.retry_policy.has_attempts_left(attempt) {
                    self.api_logger.log_failure(&context, &format!("HTTP {}", status), attempt);
                    return Err(SyncError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: attempt,
                        status,
                    });
                }

                let retry_after = response
                    .headers()
                    .get(headers::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok());
                let wait = self.retry_policy.wait_for(attempt, retry_after);

                self.api_logger.log_retry(
                    &context,
                    &format!("HTTP {}", status),
                    attempt,
                    max_attempts,
                    wait,
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            let error_text = response.text().await.unwrap_or_default();
            self.api_logger.log_failure(&context, &format!("HTTP {}", status), attempt);
            return Err(SyncError::GraphStatus {
                url: url.to_string(),
                status,
                body: excerpt(&error_text, constants::GRAPH_ERROR_EXCERPT),
            });
        }
    }
}
