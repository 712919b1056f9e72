// 图片解析配置
//
// - ResolverConfig: 启动时从环境变量读取的服务配置
// - FanartSettings: 持久化在 fanart_config.json 中的用户设置

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::services::artwork::error::ArtworkError;

/// 服务配置（启动时确定，运行期间不变）
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    /// 服务 API key，所有请求都会携带
    pub api_key: String,

    /// 覆盖默认的 fanart.tv 接口地址
    pub base_url: Option<String>,

    /// 缓存根目录
    pub cache_dir: PathBuf,

    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,

    /// 用户设置文件路径
    pub settings_path: PathBuf,
}

impl ResolverConfig {
    pub const DEFAULT_CACHE_DIR: &'static str = "cache";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_SETTINGS_PATH: &'static str = "fanart_config.json";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            cache_dir: PathBuf::from(Self::DEFAULT_CACHE_DIR),
            request_timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            settings_path: PathBuf::from(Self::DEFAULT_SETTINGS_PATH),
        }
    }

    /// 从环境变量读取配置
    ///
    /// - `FANART_API_KEY`: 必填
    /// - `FANART_BASE_URL`: 可选
    /// - `ARTWORK_CACHE_DIR`: 默认 `cache`
    /// - `FANART_REQUEST_TIMEOUT_SECS`: 默认 30
    /// - `FANART_CONFIG_PATH`: 默认 `fanart_config.json`
    pub fn from_env() -> Result<Self, ArtworkError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ArtworkError> {
        let api_key = lookup("FANART_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ArtworkError::Config("FANART_API_KEY 未设置".to_string()))?;

        let mut config = Self::new(api_key);

        config.base_url = lookup("FANART_BASE_URL").filter(|u| !u.trim().is_empty());

        if let Some(dir) = lookup("ARTWORK_CACHE_DIR").filter(|d| !d.trim().is_empty()) {
            config.cache_dir = PathBuf::from(dir);
        }

        if let Some(secs) = lookup("FANART_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = secs
                .trim()
                .parse()
                .map_err(|_| ArtworkError::Config(format!("无效的超时时间: {}", secs)))?;
        }

        if let Some(path) = lookup("FANART_CONFIG_PATH").filter(|p| !p.trim().is_empty()) {
            config.settings_path = PathBuf::from(path);
        }

        Ok(config)
    }
}

/// 用户设置（存储在 fanart_config.json）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FanartSettings {
    /// 个人 API key，非空白时作为 client_key 追加到请求中
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_api_key: Option<String>,
}

impl FanartSettings {
    /// 去除空白后的个人 API key
    pub fn client_key(&self) -> Option<&str> {
        self.personal_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}
