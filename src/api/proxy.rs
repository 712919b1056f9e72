use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ImageProxyParams {
    pub url: String,
}

/// 图片代理 - 原样转发远程图片
pub async fn proxy_image(
    State(state): State<AppState>,
    Query(params): Query<ImageProxyParams>,
) -> Result<Response, StatusCode> {
    // 验证 URL 是否合法
    let url = url::Url::parse(&params.url).map_err(|_| StatusCode::BAD_REQUEST)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(StatusCode::BAD_REQUEST);
    }

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let response = state
        .resolver
        .fetch_image_bytes(url.as_str(), &cancel)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch image: {}", e);
            StatusCode::BAD_GATEWAY
        })?;

    if !response.is_success() {
        tracing::error!("Image fetch failed with status: {}", response.status);
        return Err(StatusCode::BAD_GATEWAY);
    }

    // 获取 Content-Type
    let content_type = response
        .content_type
        .clone()
        .unwrap_or_else(|| "image/jpeg".to_string());

    // 流式转发响应体
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Cache-Control", "public, max-age=86400") // 缓存 1 天
        .header("Access-Control-Allow-Origin", "*")
        .body(axum::body::Body::from_stream(response.body))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
