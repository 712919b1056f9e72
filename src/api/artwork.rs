use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::AppState;
use super::error::{ApiError, ApiResult};
use super::response::success;
use crate::services::artwork::ImageType;

#[derive(Debug, Deserialize)]
pub struct ArtworkQuery {
    /// 首选语言，如 "en"、"de"
    pub language: Option<String>,
    /// 逗号分隔的图片类型，如 "backdrop,logo"
    pub types: Option<String>,
}

/// 解析标识符的图片列表（已排序）
pub async fn get_artwork(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Query(query): Query<ArtworkQuery>,
) -> ApiResult<impl IntoResponse> {
    let types = parse_image_types(query.types.as_deref())?;
    let language = query
        .language
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    // 客户端断开时 handler future 被丢弃，guard 随之取消进行中的请求
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let resolution = state
        .resolver
        .resolve_images_of(&identifier, language, &types, &cancel);

    let results = match tokio::time::timeout(state.resolve_timeout, resolution).await {
        Ok(result) => result?,
        Err(_) => {
            cancel.cancel();
            return Err(ApiError::Timeout(format!(
                "Artwork resolution for {} exceeded {:?}",
                identifier, state.resolve_timeout
            )));
        }
    };

    Ok(success(results))
}

/// 支持的图片类型
pub async fn get_supported_types(State(state): State<AppState>) -> impl IntoResponse {
    success(state.resolver.supported_image_types())
}

fn parse_image_types(raw: Option<&str>) -> ApiResult<Vec<ImageType>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<ImageType>()
                .map_err(|_| ApiError::BadRequest(format!("Unknown image type: {}", s)))
        })
        .collect()
}
