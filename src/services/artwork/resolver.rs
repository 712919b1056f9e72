// 图片解析服务
//
// 串联整个流程：新鲜度检查 -> 远程获取 -> 目录解析 -> 候选构建 -> 排序

use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::external::{FanartClient, HttpClient, HttpRequest, HttpResponse};
use crate::services::artwork::builder::{CandidateBuilder, ImageResult, ImageType};
use crate::services::artwork::catalog::CatalogParser;
use crate::services::artwork::fetcher::{FetchOutcome, RemoteFetcher};
use crate::services::artwork::fs::CacheFileSystem;
use crate::services::artwork::path::CacheStore;
use crate::services::artwork::ranker;
use crate::services::artwork::{ArtworkError, FanartSettings, FetchError, ResolverConfig};

/// 图片解析服务
///
/// 各请求之间没有共享的可变状态，可以并发调用
#[derive(Clone)]
pub struct ArtworkResolver {
    fetcher: RemoteFetcher,
    store: CacheStore,
    http: Arc<dyn HttpClient>,
}

impl ArtworkResolver {
    /// 支持的图片类型
    pub const SUPPORTED_IMAGE_TYPES: [ImageType; 5] = [
        ImageType::Primary,
        ImageType::Logo,
        ImageType::Art,
        ImageType::Banner,
        ImageType::Backdrop,
    ];

    pub fn new(
        config: &ResolverConfig,
        http: Arc<dyn HttpClient>,
        fs: Arc<dyn CacheFileSystem>,
        settings: Arc<RwLock<FanartSettings>>,
    ) -> Self {
        let store = CacheStore::new(config.cache_dir.clone(), fs);
        let client = FanartClient::new(http.clone(), config.api_key.clone(), config.base_url.clone());
        let fetcher = RemoteFetcher::new(client, store.clone(), settings);

        Self {
            fetcher,
            store,
            http,
        }
    }

    pub fn supported_image_types(&self) -> &'static [ImageType] {
        &Self::SUPPORTED_IMAGE_TYPES
    }

    pub fn cache_store(&self) -> &CacheStore {
        &self.store
    }

    /// 解析标识符的全部图片并排序
    ///
    /// 缓存缺失或损坏时返回空列表，不视为错误
    pub async fn resolve_images(
        &self,
        identifier: &str,
        preferred_language: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ImageResult>, ArtworkError> {
        self.resolve_images_of(identifier, preferred_language, &[], cancel)
            .await
    }

    /// 解析指定类型的图片，`types` 为空时返回全部类型
    pub async fn resolve_images_of(
        &self,
        identifier: &str,
        preferred_language: Option<&str>,
        types: &[ImageType],
        cancel: &CancellationToken,
    ) -> Result<Vec<ImageResult>, ArtworkError> {
        validate_identifier(identifier)?;

        if self.fetcher.ensure_fresh(identifier, cancel).await? == FetchOutcome::Cancelled {
            return Err(ArtworkError::Cancelled);
        }

        let path = self.store.path_for(identifier);
        let catalog = match CatalogParser::parse(&self.store, &path).await {
            Ok(catalog) => catalog,
            Err(e) if e.is_missing_data() => {
                warn!("目录不可用，返回空结果: {} - {}", identifier, e);
                return Ok(Vec::new());
            }
            Err(ArtworkError::Io(e)) => {
                warn!("读取目录失败，返回空结果: {} - {}", identifier, e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut results = CandidateBuilder::build_results(&catalog);
        if !types.is_empty() {
            results.retain(|r| types.contains(&r.image_type));
        }

        debug!("解析到 {} 张图片: {}", results.len(), identifier);

        Ok(ranker::rank(results, preferred_language))
    }

    /// 图片代理：直接转发远程响应，不缓存、不转换
    pub async fn fetch_image_bytes(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, FetchError> {
        self.http.send(HttpRequest::get(url), cancel).await
    }
}

/// 标识符不能为空，也不能包含路径分隔符
fn validate_identifier(identifier: &str) -> Result<(), ArtworkError> {
    let invalid = identifier.trim().is_empty()
        || identifier.contains(['/', '\\'])
        || identifier == "."
        || identifier == "..";

    if invalid {
        return Err(ArtworkError::InvalidIdentifier(identifier.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::http::testing::{StubHttpClient, StubReply};
    use crate::services::artwork::builder::Category;
    use crate::services::artwork::fs::LocalFileSystem;
    use bytes::Bytes;
    use tempfile::TempDir;

    const CATALOG: &str = r#"{
        "name": "Test Artist",
        "artistthumb": [
            {"id": "1", "url": "http://assets/thumb-fr.jpg", "lang": "fr", "likes": "9"},
            {"id": "2", "url": "", "lang": "de", "likes": "50"}
        ],
        "artistbackground": [
            {"id": "3", "url": "https://assets/bg-de.jpg", "lang": "de", "likes": "1"},
            {"id": "4", "url": "https://assets/bg-en.jpg", "lang": "en", "likes": "8"}
        ],
        "musiclogo": [
            {"id": "5", "url": "https://assets/logo.png", "likes": "2"}
        ],
        "hdmusiclogo": [
            {"id": "6", "url": "https://assets/hdlogo.png", "lang": "de", "likes": "x"}
        ]
    }"#;

    fn resolver(temp_dir: &TempDir, stub: Arc<StubHttpClient>) -> ArtworkResolver {
        let mut config = ResolverConfig::new("service-key");
        config.cache_dir = temp_dir.path().to_path_buf();

        ArtworkResolver::new(
            &config,
            stub,
            Arc::new(LocalFileSystem),
            Arc::new(RwLock::new(FanartSettings::default())),
        )
    }

    #[tokio::test]
    async fn test_resolve_ranks_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(StubHttpClient::with_replies(vec![StubReply::Status(200, CATALOG)]));
        let resolver = resolver(&temp_dir, stub.clone());

        let results = resolver
            .resolve_images("artist", Some("de"), &CancellationToken::new())
            .await
            .unwrap();

        let urls: Vec<_> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://assets/bg-de.jpg",
                "https://assets/bg-en.jpg",
                "https://assets/hdlogo.png",
                "https://assets/thumb-fr.jpg",
                "https://assets/logo.png",
            ]
        );
        assert_eq!(results[2].community_rating, None);
        assert_eq!(stub.request_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_filters_types() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(StubHttpClient::with_replies(vec![StubReply::Status(200, CATALOG)]));
        let resolver = resolver(&temp_dir, stub);

        let results = resolver
            .resolve_images_of("artist", Some("en"), &[ImageType::Logo], &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.image_type == ImageType::Logo));
        assert_eq!(results[0].category, Category::HdLogo);
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(StubHttpClient::with_replies(vec![StubReply::Status(200, CATALOG)]));
        let resolver = resolver(&temp_dir, stub.clone());
        let cancel = CancellationToken::new();

        let first = resolver.resolve_images("artist", Some("en"), &cancel).await.unwrap();
        let second = resolver.resolve_images("artist", Some("en"), &cancel).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(stub.request_count(), 1);
    }

    #[tokio::test]
    async fn test_not_found_yields_empty_results() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(StubHttpClient::with_replies(vec![StubReply::Status(404, "")]));
        let resolver = resolver(&temp_dir, stub);

        let results = resolver
            .resolve_images("ghost", Some("en"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(results.is_empty());
        assert!(resolver.cache_store().exists(&resolver.cache_store().path_for("ghost")).await);
    }

    #[tokio::test]
    async fn test_corrupt_cache_yields_empty_results() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(StubHttpClient::default());
        let resolver = resolver(&temp_dir, stub.clone());
        let store = resolver.cache_store();
        store
            .write(&store.path_for("broken"), Bytes::from_static(b"<html>rate limited</html>"))
            .await
            .unwrap();

        let results = resolver
            .resolve_images("broken", Some("en"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(results.is_empty());
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_error_is_surfaced() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(StubHttpClient::with_replies(vec![StubReply::Status(502, "")]));
        let resolver = resolver(&temp_dir, stub);

        let err = resolver
            .resolve_images("artist", Some("en"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ArtworkError::Fetch(FetchError::HttpError(502))));
    }

    #[tokio::test]
    async fn test_cancelled_resolution() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(StubHttpClient::with_replies(vec![StubReply::Status(200, CATALOG)]));
        let resolver = resolver(&temp_dir, stub);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = resolver.resolve_images("artist", Some("en"), &cancel).await.unwrap_err();
        assert!(matches!(err, ArtworkError::Cancelled));
    }

    #[tokio::test]
    async fn test_invalid_identifiers_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(StubHttpClient::default());
        let resolver = resolver(&temp_dir, stub.clone());
        let cancel = CancellationToken::new();

        for identifier in ["", "  ", "..", "a/b", "a\\b"] {
            let err = resolver.resolve_images(identifier, None, &cancel).await.unwrap_err();
            assert!(matches!(err, ArtworkError::InvalidIdentifier(_)), "{:?}", identifier);
        }
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn test_identifier_is_encoded_in_request() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(StubHttpClient::with_replies(vec![StubReply::Status(200, CATALOG)]));
        let resolver = resolver(&temp_dir, stub.clone());

        let results = resolver
            .resolve_images("a#b?c", None, &CancellationToken::new())
            .await
            .unwrap();

        assert!(!results.is_empty());
        assert_eq!(
            stub.requests(),
            vec!["https://webservice.fanart.tv/v3/music/a%23b%3Fc?api_key=service-key"]
        );
        assert!(resolver.cache_store().exists(&resolver.cache_store().path_for("a#b?c")).await);
    }

    #[tokio::test]
    async fn test_numeric_album_fields_keep_ranked_images() {
        const WITH_ALBUMS: &str = r#"{
            "artistbackground": [{"id": "1", "url": "https://assets/bg.jpg", "likes": "3"}],
            "albums": {"rg": {"cdart": [{"id": 7, "url": "https://assets/cd.png", "disc": 1, "size": 1000}]}}
        }"#;
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(StubHttpClient::with_replies(vec![StubReply::Status(200, WITH_ALBUMS)]));
        let resolver = resolver(&temp_dir, stub);

        let results = resolver
            .resolve_images("artist", Some("en"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://assets/bg.jpg");
        assert_eq!(results[0].community_rating, Some(3));
    }

    #[tokio::test]
    async fn test_fetch_image_bytes_passes_through() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(StubHttpClient::with_replies(vec![StubReply::Status(200, "PNGDATA")]));
        let resolver = resolver(&temp_dir, stub.clone());
        let cancel = CancellationToken::new();

        let response = resolver
            .fetch_image_bytes("https://assets/logo.png", &cancel)
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(&response.collect(&cancel).await.unwrap()[..], b"PNGDATA");
        assert_eq!(stub.requests(), vec!["https://assets/logo.png"]);
    }

    #[test]
    fn test_supported_image_types() {
        assert_eq!(ArtworkResolver::SUPPORTED_IMAGE_TYPES.len(), 5);
        assert!(ArtworkResolver::SUPPORTED_IMAGE_TYPES.contains(&ImageType::Backdrop));
    }
}
