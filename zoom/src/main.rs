use tfplug::context::Context;
use tfplug::provider::ProviderMetadataRequest;
use tfplug::Provider;
use zoom::ZoomProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Already installed is fine
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let provider = ZoomProvider::new();
    let metadata = provider
        .metadata(Context::new(), ProviderMetadataRequest)
        .await;

    let mut resources: Vec<String> = provider.resources().into_keys().collect();
    resources.sort();

    tracing::info!(
        provider = %metadata.type_name,
        version = %metadata.version,
        "Provider ready"
    );
    for name in &resources {
        tracing::info!(resource = %name, "Registered resource");
    }

    Ok(())
}
