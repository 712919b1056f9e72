// 文件系统能力接口
//
// 缓存层只通过该接口访问磁盘，便于替换实现

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::fs;

/// 缓存文件系统能力
#[async_trait]
pub trait CacheFileSystem: Send + Sync {
    /// 文件的最后写入时间，文件不存在时返回 None
    async fn modified(&self, path: &Path) -> Option<DateTime<Utc>>;

    /// 读取完整文件内容
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// 原子写入：自动创建父目录，读者只会看到旧文件或完整的新文件
    async fn write_atomic(&self, path: &Path, bytes: Bytes) -> io::Result<()>;
}

/// 基于本地磁盘的实现
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl CacheFileSystem for LocalFileSystem {
    async fn modified(&self, path: &Path) -> Option<DateTime<Utc>> {
        let metadata = fs::metadata(path).await.ok()?;
        if !metadata.is_file() {
            return None;
        }
        metadata.modified().ok().map(DateTime::<Utc>::from)
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path).await
    }

    async fn write_atomic(&self, path: &Path, bytes: Bytes) -> io::Result<()> {
        let path = path.to_path_buf();

        // 先写入同目录下的临时文件，再 rename 发布
        tokio::task::spawn_blocking(move || {
            let parent = path.parent().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("缓存路径没有父目录: {}", path.display()),
                )
            })?;
            std::fs::create_dir_all(parent)?;

            let mut tmp = NamedTempFile::new_in(parent)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(io::Error::other)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_modified_reports_absent_file() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalFileSystem;

        assert!(fs.modified(&temp_dir.path().join("missing.json")).await.is_none());
        // 目录不算缓存条目
        assert!(fs.modified(temp_dir.path()).await.is_none());
    }

    #[tokio::test]
    async fn test_write_atomic_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalFileSystem;
        let path = temp_dir.path().join("fanart-music/abc/fanart.json");

        fs.write_atomic(&path, Bytes::from_static(b"{}")).await.unwrap();

        assert_eq!(fs.read(&path).await.unwrap(), b"{}");
        assert!(fs.modified(&path).await.is_some());
    }

    #[tokio::test]
    async fn test_write_atomic_overwrites_without_leftovers() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalFileSystem;
        let path = temp_dir.path().join("entry/fanart.json");

        fs.write_atomic(&path, Bytes::from_static(b"first")).await.unwrap();
        fs.write_atomic(&path, Bytes::from_static(b"second")).await.unwrap();

        assert_eq!(fs.read(&path).await.unwrap(), b"second");

        // 临时文件已被 rename，目录中只剩目标文件
        let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);
    }
}
