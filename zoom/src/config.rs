//! Provider configuration: explicit attributes first, environment second

use serde::Deserialize;
use tfplug::{AttributePath, Diagnostic, DynamicValue};

use crate::api::oauth::DEFAULT_OAUTH_ENDPOINT;
use crate::api::DEFAULT_API_ENDPOINT;

pub const ENV_ACCOUNT_ID: &str = "ZOOM_ACCOUNT_ID";
pub const ENV_CLIENT_ID: &str = "ZOOM_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "ZOOM_CLIENT_SECRET";
pub const ENV_API_ENDPOINT: &str = "ZOOM_API_ENDPOINT";
pub const ENV_OAUTH_ENDPOINT: &str = "ZOOM_OAUTH_ENDPOINT";

/// Raw provider block as written by the user
#[derive(Debug, Default, Deserialize)]
struct ProviderBlock {
    #[serde(default)]
    account_id: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    api_endpoint: Option<String>,
    #[serde(default)]
    oauth_endpoint: Option<String>,
}

#[derive(Clone)]
pub struct ProviderConfig {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub api_endpoint: String,
    pub oauth_endpoint: String,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("account_id", &self.account_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("api_endpoint", &self.api_endpoint)
            .field("oauth_endpoint", &self.oauth_endpoint)
            .finish()
    }
}

fn resolve(value: Option<String>, env: &str) -> Option<String> {
    value
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var(env).ok())
        .filter(|v| !v.is_empty())
}

fn missing(attribute: &str, label: &str, env: &str) -> Diagnostic {
    Diagnostic::error(
        format!("Missing Zoom {}", label),
        format!(
            "The provider cannot create the Zoom API client as there is a missing or empty value for the Zoom {}. \
             Set `{}` in the provider configuration or the {} environment variable.",
            label, attribute, env
        ),
    )
    .with_attribute(AttributePath::new(attribute))
}

fn check_endpoint(value: &str, attribute: &str, diagnostics: &mut Vec<Diagnostic>) {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => diagnostics.push(
            Diagnostic::error(
                "Invalid endpoint",
                format!("`{}` must use http or https, got {}", attribute, url.scheme()),
            )
            .with_attribute(AttributePath::new(attribute)),
        ),
        Err(e) => diagnostics.push(
            Diagnostic::error(
                "Invalid endpoint",
                format!("`{}` is not a valid URL: {}", attribute, e),
            )
            .with_attribute(AttributePath::new(attribute)),
        ),
    }
}

impl ProviderConfig {
    /// Resolve every setting, collecting one diagnostic per problem
    pub fn from_dynamic(config: &DynamicValue) -> Result<Self, Vec<Diagnostic>> {
        let block: ProviderBlock = if config.is_null() {
            ProviderBlock::default()
        } else {
            config.decode().map_err(|e| {
                vec![Diagnostic::error(
                    "Invalid provider configuration",
                    e.to_string(),
                )]
            })?
        };

        let mut diagnostics = vec![];

        let account_id = resolve(block.account_id, ENV_ACCOUNT_ID);
        if account_id.is_none() {
            diagnostics.push(missing("account_id", "Account ID", ENV_ACCOUNT_ID));
        }
        let client_id = resolve(block.client_id, ENV_CLIENT_ID);
        if client_id.is_none() {
            diagnostics.push(missing("client_id", "Client ID", ENV_CLIENT_ID));
        }
        let client_secret = resolve(block.client_secret, ENV_CLIENT_SECRET);
        if client_secret.is_none() {
            diagnostics.push(missing("client_secret", "Client Secret", ENV_CLIENT_SECRET));
        }

        let api_endpoint = resolve(block.api_endpoint, ENV_API_ENDPOINT)
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());
        check_endpoint(&api_endpoint, "api_endpoint", &mut diagnostics);
        let oauth_endpoint = resolve(block.oauth_endpoint, ENV_OAUTH_ENDPOINT)
            .unwrap_or_else(|| DEFAULT_OAUTH_ENDPOINT.to_string());
        check_endpoint(&oauth_endpoint, "oauth_endpoint", &mut diagnostics);

        match (account_id, client_id, client_secret) {
            (Some(account_id), Some(client_id), Some(client_secret)) if diagnostics.is_empty() => {
                Ok(Self {
                    account_id,
                    client_id,
                    client_secret,
                    api_endpoint,
                    oauth_endpoint,
                })
            }
            _ => Err(diagnostics),
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            ENV_ACCOUNT_ID,
            ENV_CLIENT_ID,
            ENV_CLIENT_SECRET,
            ENV_API_ENDPOINT,
            ENV_OAUTH_ENDPOINT,
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn config_prefers_explicit_values_over_env() {
        clear_env();
        std::env::set_var(ENV_ACCOUNT_ID, "env-account");

        let config = ProviderConfig::from_dynamic(&DynamicValue::new(json!({
            "account_id": "acct",
            "client_id": "cid",
            "client_secret": "secret"
        })))
        .unwrap();

        assert_eq!(config.account_id, "acct");
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert_eq!(config.oauth_endpoint, DEFAULT_OAUTH_ENDPOINT);
        assert!(!format!("{:?}", config).contains("secret\""));

        clear_env();
    }

    #[test]
    #[serial]
    fn config_falls_back_to_env() {
        clear_env();
        std::env::set_var(ENV_ACCOUNT_ID, "acct");
        std::env::set_var(ENV_CLIENT_ID, "cid");
        std::env::set_var(ENV_CLIENT_SECRET, "secret");
        std::env::set_var(ENV_API_ENDPOINT, "http://127.0.0.1:9000/v2");

        let config = ProviderConfig::from_dynamic(&DynamicValue::null()).unwrap();
        assert_eq!(config.client_id, "cid");
        assert_eq!(config.api_endpoint, "http://127.0.0.1:9000/v2");

        clear_env();
    }

    #[test]
    #[serial]
    fn config_reports_every_missing_credential() {
        clear_env();

        let diagnostics = ProviderConfig::from_dynamic(&DynamicValue::new(json!({
            "account_id": ""
        })))
        .unwrap_err();

        let summaries: Vec<_> = diagnostics.iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(
            summaries,
            vec![
                "Missing Zoom Account ID",
                "Missing Zoom Client ID",
                "Missing Zoom Client Secret"
            ]
        );
        assert!(diagnostics[2].detail.contains("ZOOM_CLIENT_SECRET"));
    }

    #[test]
    #[serial]
    fn config_rejects_invalid_endpoint() {
        clear_env();

        let diagnostics = ProviderConfig::from_dynamic(&DynamicValue::new(json!({
            "account_id": "acct",
            "client_id": "cid",
            "client_secret": "secret",
            "api_endpoint": "ftp://api.zoom.us"
        })))
        .unwrap_err();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Invalid endpoint");
    }
}
