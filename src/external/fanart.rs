use bytes::Bytes;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::external::http::{HttpClient, HttpRequest};
use crate::services::artwork::FetchError;

/// 远程目录请求结果
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCatalog {
    /// 原始 JSON 文档
    Document(Bytes),
    /// 远程不存在该标识符
    NotFound,
}

/// fanart.tv API客户端
#[derive(Clone)]
pub struct FanartClient {
    http: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
}

impl FanartClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://webservice.fanart.tv/v3";

    /// 目录类型路径段
    const MUSIC_SEGMENT: &'static str = "music";

    pub fn new(http: Arc<dyn HttpClient>, api_key: String, base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            http,
            api_key,
            base_url,
        }
    }

    /// 构建目录请求 URL
    ///
    /// 标识符按路径段编码，个人 API key 仅在非空白时追加为 `client_key`
    pub fn catalog_url(&self, identifier: &str, personal_api_key: Option<&str>) -> String {
        let mut url = format!(
            "{}/{}/{}?api_key={}",
            self.base_url,
            Self::MUSIC_SEGMENT,
            urlencoding::encode(identifier),
            self.api_key
        );

        if let Some(client_key) = personal_api_key.map(str::trim).filter(|k| !k.is_empty()) {
            url.push_str("&client_key=");
            url.push_str(&urlencoding::encode(client_key));
        }

        url
    }

    /// 获取远程目录
    ///
    /// 404 返回 `RemoteCatalog::NotFound`，其他非 2xx 状态视为错误
    pub async fn fetch_catalog(
        &self,
        identifier: &str,
        personal_api_key: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<RemoteCatalog, FetchError> {
        let url = self.catalog_url(identifier, personal_api_key);

        let response = self
            .http
            .send(HttpRequest::get(url).header("Accept", "application/json"), cancel)
            .await?;

        if response.is_not_found() {
            tracing::debug!("Fanart has no catalog for {}", identifier);
            return Ok(RemoteCatalog::NotFound);
        }

        if !response.is_success() {
            return Err(FetchError::HttpError(response.status));
        }

        let body = response.collect(cancel).await?;
        tracing::debug!("Fetched Fanart catalog for {} ({} bytes)", identifier, body.len());

        Ok(RemoteCatalog::Document(body))
    }
}
