// 图片解析模块错误类型定义
//
// 定义了远程目录获取、缓存读写和解析过程中可能出现的错误类型

use std::path::PathBuf;
use thiserror::Error;

/// 图片解析的统一错误类型
#[derive(Debug, Error)]
pub enum ArtworkError {
    #[error("获取远程目录失败: {0}")]
    Fetch(#[from] FetchError),

    #[error("缓存文件不存在: {0}")]
    NotFound(PathBuf),

    #[error("缓存数据损坏: {0}")]
    CorruptData(String),

    #[error("无效的标识符: {0:?}")]
    InvalidIdentifier(String),

    #[error("请求已取消")]
    Cancelled,

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}

/// 网络传输相关错误
///
/// 远程返回 404 不属于错误，由调用方按 `RemoteCatalog::NotFound` 处理
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("网络错误: {0}")]
    NetworkError(String),

    #[error("请求超时")]
    Timeout,

    #[error("无效的 URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP 错误: 状态码 {0}")]
    HttpError(u16),

    #[error("请求已取消")]
    Cancelled,
}

// 实现从 reqwest::Error 到 FetchError 的转换
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_builder() {
            FetchError::InvalidUrl(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::HttpError(status.as_u16())
        } else {
            FetchError::NetworkError(err.to_string())
        }
    }
}

impl ArtworkError {
    /// 是否为"暂无数据"类错误（缓存缺失或损坏），这类错误不应向调用方传播
    pub fn is_missing_data(&self) -> bool {
        matches!(self, ArtworkError::NotFound(_) | ArtworkError::CorruptData(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_data_classification() {
        assert!(ArtworkError::NotFound(PathBuf::from("cache/x")).is_missing_data());
        assert!(ArtworkError::CorruptData("eof".to_string()).is_missing_data());
        assert!(!ArtworkError::Cancelled.is_missing_data());
        assert!(!ArtworkError::Fetch(FetchError::Timeout).is_missing_data());
    }

    #[test]
    fn test_fetch_error_wraps_into_artwork_error() {
        let err: ArtworkError = FetchError::HttpError(503).into();
        assert!(matches!(err, ArtworkError::Fetch(FetchError::HttpError(503))));
        assert_eq!(err.to_string(), "获取远程目录失败: HTTP 错误: 状态码 503");
    }
}
