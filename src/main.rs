use anyhow::Result;
use idm_console::{
    config::{Config, DirectoryBackend},
    directory::{Directory, InMemoryDirectory, ScimDirectory},
    docs::{DocumentationSource, HttpDocumentation, StaticDocumentation},
    web, AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting identity management console");

    // Load configuration from environment
    let config = Config::load()?;
    tracing::info!(
        environment = ?config.environment,
        docs_configured = config.docs.content_url.is_some(),
        "Configuration loaded"
    );

    let directory: Arc<dyn Directory> = match &config.directory {
        DirectoryBackend::Scim {
            scim_base_url,
            server_api_url,
            api_token,
        } => Arc::new(
            ScimDirectory::new(
                scim_base_url.clone(),
                server_api_url.clone(),
                api_token.clone(),
                config.http_connect_timeout_secs,
                config.http_request_timeout_secs,
            )
            .map_err(|e| anyhow::anyhow!("Failed to initialize SCIM client: {}", e))?,
        ),
        DirectoryBackend::Memory => {
            if config.is_production() {
                tracing::warn!("In-memory directory selected in production; changes are not persisted");
            } else {
                tracing::info!("Using seeded in-memory directory");
            }
            Arc::new(InMemoryDirectory::sample())
        }
    };

    // Help panels stay empty without a content endpoint
    let docs: Arc<dyn DocumentationSource> = match &config.docs.content_url {
        Some(content_url) => Arc::new(
            HttpDocumentation::new(
                content_url.clone(),
                config.docs.provider,
                config.docs.branch.clone(),
                config.http_connect_timeout_secs,
                config.http_request_timeout_secs,
            )
            .map_err(|e| anyhow::anyhow!("Failed to initialize documentation client: {}", e))?,
        ),
        None => Arc::new(StaticDocumentation::new()),
    };

    // Create shared application state
    let bind_address = config.bind_address();
    let state = Arc::new(AppState {
        directory,
        docs,
        config: Arc::new(config),
    });

    let app = web::create_router(state);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Console listening on {}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
