// 缓存路径与缓存存储
//
// 提供统一的目录文件路径生成，以及存在性、修改时间查询和原子写入

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::services::artwork::fs::CacheFileSystem;

/// 目录缓存存储
///
/// 每个标识符对应一个子目录，刷新时整体覆盖
#[derive(Clone)]
pub struct CacheStore {
    /// 缓存根目录
    root: PathBuf,
    fs: Arc<dyn CacheFileSystem>,
}

impl CacheStore {
    /// 服务缓存目录
    const SERVICE_DIR: &'static str = "fanart-music";

    /// 目录文件名
    const CATALOG_FILE: &'static str = "fanart.json";

    pub fn new(root: impl Into<PathBuf>, fs: Arc<dyn CacheFileSystem>) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }

    /// 生成目录缓存路径
    ///
    /// # 返回
    /// 本地文件路径，格式：`{root}/fanart-music/{identifier}/fanart.json`
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.service_root()
            .join(identifier)
            .join(Self::CATALOG_FILE)
    }

    /// 服务缓存根目录
    pub fn service_root(&self) -> PathBuf {
        self.root.join(Self::SERVICE_DIR)
    }

    /// 缓存根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn exists(&self, path: &Path) -> bool {
        self.fs.modified(path).await.is_some()
    }

    /// 最后写入时间，文件不存在时返回 None（不报错）
    pub async fn last_modified(&self, path: &Path) -> Option<DateTime<Utc>> {
        self.fs.modified(path).await
    }

    pub async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.fs.read(path).await
    }

    /// 原子写入，自动创建父目录
    pub async fn write(&self, path: &Path, bytes: Bytes) -> io::Result<()> {
        self.fs.write_atomic(path, bytes).await
    }
}
