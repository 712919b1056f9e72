pub mod artwork;
pub mod error;
pub mod health;
pub mod proxy;
pub mod response;
pub mod settings;

use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

use crate::services::artwork::{ArtworkResolver, ConfigManager};

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ArtworkResolver>,
    pub config_manager: Arc<ConfigManager>,
    /// 单次解析的最长时间，超时后取消进行中的请求
    pub resolve_timeout: Duration,
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Artwork Resolver API v1.0" }))
        .route("/api/health", get(health::health_check))
        // Artwork
        .route("/api/artwork/types", get(artwork::get_supported_types))
        .route("/api/artwork/:identifier", get(artwork::get_artwork))
        // Image proxy
        .route("/api/proxy/image", get(proxy::proxy_image))
        // Settings
        .route(
            "/api/config",
            get(settings::get_settings).put(settings::update_settings),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
