//! Server-to-server OAuth (account credentials grant)

use serde::Deserialize;

use super::common::ApiQueryParams;
use super::error::ApiError;
use super::pool::{ConnectionPoolConfig, ConnectionPoolManager};

pub const DEFAULT_OAUTH_ENDPOINT: &str = "https://zoom.us";

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
}

pub struct OAuthClient {
    http_client: reqwest::Client,
    token_url: url::Url,
}

impl OAuthClient {
    pub fn new(endpoint: &str) -> Result<Self, ApiError> {
        let base = url::Url::parse(endpoint)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        let token_url = base
            .join("/oauth/token")
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

        let http_client =
            ConnectionPoolManager::new(ConnectionPoolConfig::default()).build_client()?;

        Ok(Self {
            http_client,
            token_url,
        })
    }

    /// POST /oauth/token?grant_type=account_credentials&account_id=..
    pub async fn get_access_token(
        &self,
        account_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<TokenResponse, ApiError> {
        let query = ApiQueryParams::new()
            .add("grant_type", "account_credentials")
            .add("account_id", account_id)
            .to_query_string();
        let url = format!("{}{}", self.token_url, query);

        tracing::debug!("Requesting OAuth token from: {}", self.token_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(client_id, Some(client_secret))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!("OAuth token request failed with HTTP {}", status);
            return Err(ApiError::OAuthError(format!("HTTP {}: {}", status, text)));
        }

        let token: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::OAuthError(format!("failed to parse token response: {}", e)))?;

        if token.access_token.is_empty() {
            return Err(ApiError::OAuthError(
                "token response carried an empty access_token".to_string(),
            ));
        }

        Ok(token)
    }
}
