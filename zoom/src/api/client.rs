use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::common::{ApiErrorBody, ApiQueryParams};
use super::error::ApiError;
use super::pool::{ConnectionPoolConfig, ConnectionPoolManager};

/// Zoom REST API client. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    auth_header: String,
    retry_config: RetryConfig,
    pool_manager: ConnectionPoolManager,
}

/// Bounded exponential backoff for throttled and unavailable responses
#[derive(Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            timeout_seconds: 30,
        }
    }
}

impl RetryConfig {
    /// Delay before retry `attempt` (1-based), doubling up to the cap
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(
            self.initial_backoff_ms
                .saturating_mul(factor)
                .min(self.max_backoff_ms),
        )
    }
}

/// Result of a single HTTP exchange
enum Attempt<T> {
    Done(Result<T, ApiError>),
    Retry(ApiError),
}

impl Client {
    pub fn new(endpoint: &str, access_token: &str) -> Result<Self, ApiError> {
        Self::with_config(endpoint, access_token, RetryConfig::default())
    }

    pub fn with_config(
        endpoint: &str,
        access_token: &str,
        retry_config: RetryConfig,
    ) -> Result<Self, ApiError> {
        let parsed = url::Url::parse(endpoint)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidEndpoint(format!(
                "{}: unsupported scheme {}",
                endpoint,
                parsed.scheme()
            )));
        }

        let pool_manager = ConnectionPoolManager::new(ConnectionPoolConfig {
            request_timeout: Duration::from_secs(retry_config.timeout_seconds),
            ..Default::default()
        });
        let http_client = pool_manager.build_client()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: endpoint.trim_end_matches('/').to_string(),
                auth_header: format!("Bearer {}", access_token),
                retry_config,
                pool_manager,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::GET, path, None::<&()>).await
    }

    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &ApiQueryParams,
    ) -> Result<T, ApiError> {
        self.get(&format!("{}{}", path, params.to_query_string()))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::DELETE, path, None::<&()>).await
    }

    pub async fn delete_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &ApiQueryParams,
    ) -> Result<T, ApiError> {
        self.delete(&format!("{}{}", path, params.to_query_string()))
            .await
    }

    pub async fn get_connection_stats(&self) -> super::pool::ConnectionStats {
        self.inner.pool_manager.get_stats().await
    }

    pub fn call_handling(&self) -> crate::api::call_handling::CallHandlingApi<'_> {
        crate::api::call_handling::CallHandlingApi::new(self)
    }

    pub fn call_queues(&self) -> crate::api::call_queues::CallQueuesApi<'_> {
        crate::api::call_queues::CallQueuesApi::new(self)
    }

    pub fn shared_line_groups(&self) -> crate::api::shared_line_groups::SharedLineGroupsApi<'_> {
        crate::api::shared_line_groups::SharedLineGroupsApi::new(self)
    }

    pub fn users(&self) -> crate::api::users::UsersApi<'_> {
        crate::api::users::UsersApi::new(self)
    }

    /// Issue a request, retrying 429, 5xx, timeouts and connect failures
    async fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        let retry = &self.inner.retry_config;
        let mut last_error = ApiError::ServiceUnavailable;

        for attempt in 0..=retry.max_retries {
            if attempt > 0 {
                let delay = retry.backoff(attempt);
                tracing::debug!(
                    %method,
                    path,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying request after: {}", last_error
                );
                self.inner.pool_manager.record_retry().await;
                tokio::time::sleep(delay).await;
            }

            tracing::debug!("{} request to: {}", method, url);
            let mut request = self
                .inner
                .http_client
                .request(method.clone(), &url)
                .header(AUTHORIZATION, &self.inner.auth_header);
            if let Some(body) = body {
                request = request.json(body);
            }

            match self.attempt(request).await {
                Attempt::Done(result) => return result,
                Attempt::Retry(e) => last_error = e,
            }
        }

        Err(last_error)
    }

    async fn attempt<T: DeserializeOwned>(&self, request: RequestBuilder) -> Attempt<T> {
        let stats = &self.inner.pool_manager;

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                stats.record_request(false).await;
                return if e.is_timeout() {
                    Attempt::Retry(ApiError::Timeout(self.inner.retry_config.timeout_seconds))
                } else if e.is_connect() {
                    Attempt::Retry(ApiError::ServiceUnavailable)
                } else {
                    Attempt::Done(Err(ApiError::RequestError(e)))
                };
            }
        };

        let status = response.status();
        stats.record_request(status.is_success()).await;

        match status {
            s if s.is_success() => Attempt::Done(parse_success(response).await),
            StatusCode::UNAUTHORIZED => Attempt::Done(Err(ApiError::AuthError)),
            StatusCode::TOO_MANY_REQUESTS => Attempt::Retry(ApiError::RateLimited),
            s if s.is_server_error() => Attempt::Retry(ApiError::ServiceUnavailable),
            _ => Attempt::Done(Err(error_from_response(response).await)),
        }
    }
}

/// An empty body (204) decodes as JSON null
async fn parse_success<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await?;
    tracing::debug!("API response body: {}", text);

    let body = if text.trim().is_empty() {
        "null"
    } else {
        text.as_str()
    };

    serde_json::from_str::<T>(body).map_err(|e| {
        tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
        ApiError::ParseError(format!("Failed to parse response: {}", e))
    })
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    let details = serde_json::from_str::<ApiErrorBody>(&text).ok().map(Box::new);
    let message = details
        .as_ref()
        .and_then(|d| d.message.clone())
        .unwrap_or(text);

    ApiError::ApiError {
        status,
        message,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_up_to_cap() {
        let retry = RetryConfig {
            max_retries: 5,
            initial_backoff_ms: 100,
            max_backoff_ms: 300,
            timeout_seconds: 1,
        };
        assert_eq!(retry.backoff(1), Duration::from_millis(100));
        assert_eq!(retry.backoff(2), Duration::from_millis(200));
        assert_eq!(retry.backoff(3), Duration::from_millis(300));
        assert_eq!(retry.backoff(40), Duration::from_millis(300));
    }
}
