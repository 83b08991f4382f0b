use mockito::{Mock, ServerGuard};
use serde_json::json;
use tfplug::context::Context;
use tfplug::provider::{ConfigureProviderRequest, Provider};
use tfplug::resource::ConfigureResourceRequest;
use tfplug::{DynamicValue, ProviderResource, ResourceWithConfigure};
use zoom::ZoomProvider;

/// Token endpoint answering every credentials exchange
pub async fn mock_oauth(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/oauth/token")
        .with_body(json!({"access_token": "integration-token", "token_type": "bearer"}).to_string())
        .create_async()
        .await
}

/// A resource built from the provider's factory and configured against `server`
pub async fn configured_resource(
    server: &mut ServerGuard,
    type_name: &str,
) -> Box<dyn ProviderResource> {
    let _oauth = mock_oauth(server).await;

    let mut provider = ZoomProvider::new();
    let response = provider
        .configure(
            Context::new(),
            ConfigureProviderRequest {
                terraform_version: "1.9.0".to_string(),
                config: DynamicValue::new(json!({
                    "account_id": "acc",
                    "client_id": "cid",
                    "client_secret": "secret",
                    "api_endpoint": server.url(),
                    "oauth_endpoint": server.url(),
                })),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);

    let factory = provider.resources()[type_name];
    let mut resource = factory();
    let configured = resource
        .configure(
            Context::new(),
            ConfigureResourceRequest {
                provider_data: response.provider_data,
            },
        )
        .await;
    assert!(configured.diagnostics.is_empty());

    resource
}
