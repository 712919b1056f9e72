// 设置管理器 - 管理用户设置的读写和更新
//
// 本模块提供 fanart 用户设置的持久化管理功能，包括：
// - 从 JSON 文件加载设置
// - 保存设置到 JSON 文件
// - 更新个人 API key

use crate::services::artwork::{ArtworkError, FanartSettings};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

/// 设置管理器
///
/// 设置通过 Arc<RwLock> 共享给获取器，更新后下一次请求立即生效
pub struct ConfigManager {
    /// 设置文件路径
    config_path: PathBuf,

    /// 用户设置（使用读写锁保证线程安全）
    settings: Arc<RwLock<FanartSettings>>,
}

impl ConfigManager {
    /// 从设置文件加载
    ///
    /// # 行为
    /// - 如果设置文件不存在，使用默认设置并创建文件
    /// - 如果设置文件损坏，使用默认设置并备份旧文件
    pub async fn load(config_path: impl Into<PathBuf>) -> Result<Self, ArtworkError> {
        let config_path = config_path.into();

        let settings = if fs::try_exists(&config_path).await.unwrap_or(false) {
            match fs::read_to_string(&config_path).await {
                Ok(content) => match serde_json::from_str::<FanartSettings>(&content) {
                    Ok(settings) => {
                        tracing::info!("成功加载 fanart 设置: {:?}", config_path);
                        settings
                    }
                    Err(e) => {
                        tracing::warn!("设置文件损坏，使用默认设置: {}", e);
                        Self::backup_corrupted_config(&config_path).await;
                        FanartSettings::default()
                    }
                },
                Err(e) => {
                    tracing::warn!("读取设置文件失败，使用默认设置: {}", e);
                    FanartSettings::default()
                }
            }
        } else {
            tracing::info!("设置文件不存在，使用默认设置");
            FanartSettings::default()
        };

        let manager = Self {
            config_path,
            settings: Arc::new(RwLock::new(settings)),
        };

        if !fs::try_exists(&manager.config_path).await.unwrap_or(false) {
            manager.save().await?;
        }

        Ok(manager)
    }

    /// 保存设置到文件
    pub async fn save(&self) -> Result<(), ArtworkError> {
        let settings = self.settings.read().await;

        let json = serde_json::to_string_pretty(&*settings)?;

        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    ArtworkError::Config(format!("创建设置目录失败: {}", e))
                })?;
            }
        }

        fs::write(&self.config_path, json).await.map_err(|e| {
            ArtworkError::Config(format!("写入设置文件失败: {}", e))
        })?;

        tracing::info!("成功保存 fanart 设置: {:?}", self.config_path);
        Ok(())
    }

    /// 更新个人 API key，空白值视为清除
    pub async fn set_personal_api_key(&self, key: Option<String>) -> Result<(), ArtworkError> {
        let key = key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());

        {
            let mut settings = self.settings.write().await;
            tracing::info!(
                "更新个人 API key: {}",
                if key.is_some() { "已设置" } else { "已清除" }
            );
            settings.personal_api_key = key;
        }

        self.save().await
    }

    /// 获取完整设置（克隆）
    pub async fn get_settings(&self) -> FanartSettings {
        self.settings.read().await.clone()
    }

    /// 获取设置的共享引用
    pub fn get_settings_ref(&self) -> Arc<RwLock<FanartSettings>> {
        Arc::clone(&self.settings)
    }

    /// 备份损坏的设置文件，备份失败不影响主流程
    async fn backup_corrupted_config(config_path: &Path) {
        let backup_path = config_path.with_extension("json.backup");

        match fs::rename(config_path, &backup_path).await {
            Ok(_) => tracing::info!("已备份损坏的设置文件到: {:?}", backup_path),
            Err(e) => tracing::warn!("备份设置文件失败: {}", e),
        }
    }
}
