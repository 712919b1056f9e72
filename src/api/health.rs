use axum::{
    extract::State,
    response::IntoResponse,
};
use serde_json::json;

use super::AppState;
use super::response::success;
use crate::services::artwork::PROVIDER_NAME;

/// 健康检查端点
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let settings = state.config_manager.get_settings().await;

    let personal_key_status = if settings.client_key().is_some() {
        "configured"
    } else {
        "not_configured"
    };

    success(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "provider": PROVIDER_NAME,
        "cache_root": state.resolver.cache_store().root().display().to_string(),
        "personal_api_key": personal_key_status,
        "supported_image_types": state.resolver.supported_image_types(),
    }))
}
