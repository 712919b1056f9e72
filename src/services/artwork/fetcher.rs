// 远程目录获取器
//
// 根据新鲜度策略决定是否访问网络：
// - 缓存新鲜：直接返回，不发起请求（远程接口按 API key 限流）
// - 缓存过期或缺失：请求远程目录并原子写入缓存
// - 远程 404：写入空目录，在新鲜期内不再重复请求
// - 传输失败或取消：保留原有缓存不变

use bytes::Bytes;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::external::{FanartClient, RemoteCatalog};
use crate::services::artwork::catalog::RawCatalog;
use crate::services::artwork::freshness::FreshnessPolicy;
use crate::services::artwork::path::CacheStore;
use crate::services::artwork::{ArtworkError, FanartSettings, FetchError};

/// 获取结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 缓存仍然新鲜，未发起请求
    Fresh,
    /// 已下载并写入缓存
    Downloaded,
    /// 远程不存在，已写入空目录
    EmptyNotFound,
    /// 请求被取消，缓存未改动
    Cancelled,
}

/// 远程目录获取器
#[derive(Clone)]
pub struct RemoteFetcher {
    client: FanartClient,
    store: CacheStore,
    policy: FreshnessPolicy,
    settings: Arc<RwLock<FanartSettings>>,
}

impl RemoteFetcher {
    pub fn new(
        client: FanartClient,
        store: CacheStore,
        settings: Arc<RwLock<FanartSettings>>,
    ) -> Self {
        Self {
            client,
            store,
            policy: FreshnessPolicy,
            settings,
        }
    }

    /// 确保标识符的缓存目录是新鲜的
    ///
    /// # 返回
    /// - `Ok(FetchOutcome)`: 缓存可用（或请求被取消）
    /// - `Err(ArtworkError::Fetch)`: 网络错误或非 404 的失败状态码
    /// - `Err(ArtworkError::Io)`: 写入缓存失败
    pub async fn ensure_fresh(
        &self,
        identifier: &str,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome, ArtworkError> {
        let path = self.store.path_for(identifier);
        let last_modified = self.store.last_modified(&path).await;

        if !self.policy.needs_refresh(last_modified, Utc::now()) {
            debug!("缓存新鲜，跳过请求: {}", identifier);
            return Ok(FetchOutcome::Fresh);
        }

        if cancel.is_cancelled() {
            return Ok(FetchOutcome::Cancelled);
        }

        debug!(
            "缓存{}，请求远程目录: {}",
            if last_modified.is_some() { "已过期" } else { "不存在" },
            identifier
        );

        let client_key = self.settings.read().await.client_key().map(str::to_string);

        let remote = match self
            .client
            .fetch_catalog(identifier, client_key.as_deref(), cancel)
            .await
        {
            Ok(remote) => remote,
            Err(FetchError::Cancelled) => {
                debug!("请求已取消: {}", identifier);
                return Ok(FetchOutcome::Cancelled);
            }
            Err(e) => {
                warn!("获取远程目录失败: {} - 错误: {}", identifier, e);
                return Err(e.into());
            }
        };

        // 写入前再次检查，取消的请求不改动缓存
        if cancel.is_cancelled() {
            return Ok(FetchOutcome::Cancelled);
        }

        match remote {
            RemoteCatalog::Document(body) => {
                self.persist(&path, body).await?;
                info!("目录已缓存: {} -> {:?}", identifier, path);
                Ok(FetchOutcome::Downloaded)
            }
            RemoteCatalog::NotFound => {
                self.persist(&path, Bytes::from(RawCatalog::empty_document()?))
                    .await?;
                info!("远程无此目录，已写入空目录: {}", identifier);
                Ok(FetchOutcome::EmptyNotFound)
            }
        }
    }

    async fn persist(&self, path: &Path, body: Bytes) -> Result<(), ArtworkError> {
        self.store.write(path, body).await.map_err(|e| {
            warn!("写入缓存失败: {:?} - 错误: {}", path, e);
            ArtworkError::Io(e)
        })
    }
}
