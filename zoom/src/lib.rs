pub mod api;
pub mod config;
pub mod provider_data;
pub mod reconcile;
pub mod resources;

pub use provider_data::ZoomProviderData;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, ProviderMetadataRequest,
    ProviderMetadataResponse, ProviderSchemaRequest, ProviderSchemaResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::{Diagnostic, Provider, ProviderResource, ResourceFactory};

use crate::api::oauth::OAuthClient;
use crate::config::ProviderConfig;

pub struct ZoomProvider {
    provider_data: Option<ZoomProviderData>,
}

impl Default for ZoomProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoomProvider {
    pub fn new() -> Self {
        Self {
            provider_data: None,
        }
    }

    async fn connect(config: &ProviderConfig) -> Result<ZoomProviderData, Diagnostic> {
        let token = OAuthClient::new(&config.oauth_endpoint)
            .map_err(|e| Diagnostic::error("Invalid OAuth endpoint", e.to_string()))?
            .get_access_token(&config.account_id, &config.client_id, &config.client_secret)
            .await
            .map_err(|e| {
                Diagnostic::error(
                    "Unable to get Zoom API access token",
                    format!(
                        "Unable to get access token. Please also check your Account ID, \
                         Client ID or Client Secret just to be sure. Error: {}",
                        e
                    ),
                )
            })?;

        let client = api::Client::new(&config.api_endpoint, &token.access_token).map_err(|e| {
            Diagnostic::error("Failed to create API client", e.to_string())
        })?;

        Ok(ZoomProviderData::new(client))
    }
}

fn business_hours() -> Box<dyn ProviderResource> {
    Box::new(resources::BusinessHoursResource::new())
}

fn closed_hours() -> Box<dyn ProviderResource> {
    Box::new(resources::ClosedHoursResource::new())
}

fn holiday_hours() -> Box<dyn ProviderResource> {
    Box::new(resources::HolidayHoursResource::new())
}

fn call_queue_members() -> Box<dyn ProviderResource> {
    Box::new(resources::CallQueueMembersResource::new())
}

fn call_queue_phone_numbers() -> Box<dyn ProviderResource> {
    Box::new(resources::CallQueuePhoneNumbersResource::new())
}

fn shared_line_group_members() -> Box<dyn ProviderResource> {
    Box::new(resources::SharedLineGroupMembersResource::new())
}

fn shared_line_group_phone_numbers() -> Box<dyn ProviderResource> {
    Box::new(resources::SharedLineGroupPhoneNumbersResource::new())
}

fn user_phone_numbers() -> Box<dyn ProviderResource> {
    Box::new(resources::UserPhoneNumbersResource::new())
}

#[async_trait]
impl Provider for ZoomProvider {
    fn type_name(&self) -> &str {
        "zoom"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: self.type_name().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ProviderSchemaRequest,
    ) -> ProviderSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Interact with Zoom Phone")
            .attribute(
                AttributeBuilder::new("account_id", AttributeType::String)
                    .description("Zoom account ID. May also be set with ZOOM_ACCOUNT_ID")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("client_id", AttributeType::String)
                    .description("Server-to-server OAuth client ID. May also be set with ZOOM_CLIENT_ID")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("client_secret", AttributeType::String)
                    .description(
                        "Server-to-server OAuth client secret. May also be set with ZOOM_CLIENT_SECRET",
                    )
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("api_endpoint", AttributeType::String)
                    .description("Base URL of the Zoom REST API")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("oauth_endpoint", AttributeType::String)
                    .description("Base URL of the Zoom OAuth server")
                    .optional()
                    .build(),
            )
            .build();

        ProviderSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let config = match ProviderConfig::from_dynamic(&request.config) {
            Ok(config) => config,
            Err(diagnostics) => {
                return ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                }
            }
        };

        match Self::connect(&config).await {
            Ok(data) => {
                tracing::info!(
                    api_endpoint = %config.api_endpoint,
                    "Configured Zoom provider"
                );
                self.provider_data = Some(data.clone());
                ConfigureProviderResponse {
                    diagnostics: vec![],
                    provider_data: Some(Arc::new(data)),
                }
            }
            Err(diagnostic) => ConfigureProviderResponse {
                diagnostics: vec![diagnostic],
                provider_data: None,
            },
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let factories: [(&str, ResourceFactory); 8] = [
            ("zoom_phone_call_handling_business_hours", business_hours),
            ("zoom_phone_call_handling_closed_hours", closed_hours),
            ("zoom_phone_call_handling_holiday_hours", holiday_hours),
            ("zoom_phone_call_queue_members", call_queue_members),
            ("zoom_phone_call_queue_phone_numbers", call_queue_phone_numbers),
            ("zoom_phone_shared_line_group_members", shared_line_group_members),
            (
                "zoom_phone_shared_line_group_phone_numbers",
                shared_line_group_phone_numbers,
            ),
            ("zoom_phone_user_phone_numbers", user_phone_numbers),
        ];

        factories
            .into_iter()
            .map(|(name, factory)| (name.to_string(), factory))
            .collect()
    }
}
