use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use artwork_resolver::api::{self, AppState};
use artwork_resolver::external::ReqwestHttpClient;
use artwork_resolver::services::artwork::{
    ArtworkResolver, ConfigManager, LocalFileSystem, ResolverConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = ResolverConfig::from_env()?;
    let request_timeout = Duration::from_secs(config.request_timeout_secs);

    // Load user settings (personal API key)
    let config_manager = Arc::new(ConfigManager::load(config.settings_path.clone()).await?);

    // Initialize external HTTP client
    let http = Arc::new(ReqwestHttpClient::new(request_timeout)?);

    let resolver = ArtworkResolver::new(
        &config,
        http,
        Arc::new(LocalFileSystem),
        config_manager.get_settings_ref(),
    );

    tracing::info!("Artwork cache root: {:?}", config.cache_dir);

    let app = api::router(AppState {
        resolver: Arc::new(resolver),
        config_manager,
        resolve_timeout: request_timeout,
    });

    // Run the server
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("🚀 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
