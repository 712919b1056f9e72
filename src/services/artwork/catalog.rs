// 远程图片目录数据结构与解析
//
// 字段与 fanart.tv v3 音乐接口的返回一一对应，未知字段忽略

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::services::artwork::error::ArtworkError;
use crate::services::artwork::path::CacheStore;

/// 单张图片候选
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawImage {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// 点赞数，接口通常以字符串形式返回
    #[serde(default, deserialize_with = "string_or_number")]
    pub likes: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub disc: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub size: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

/// 专辑下的图片分组（不参与排序）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub release_group_id: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub cdart: Vec<RawImage>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub albumcover: Vec<RawImage>,
}

/// 专辑集合：线上接口以 release group id 为键，旧格式为列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Albums {
    Keyed(BTreeMap<String, Album>),
    Listed(Vec<Album>),
}

impl Default for Albums {
    fn default() -> Self {
        Albums::Listed(Vec::new())
    }
}

impl Albums {
    pub fn len(&self) -> usize {
        match self {
            Albums::Keyed(map) => map.len(),
            Albums::Listed(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 远程图片目录
///
/// 每次解析缓存文件时重新创建，刷新时整体替换
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCatalog {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mbid_id: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub artistthumb: Vec<RawImage>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub artistbackground: Vec<RawImage>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub hdmusiclogo: Vec<RawImage>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub musicbanner: Vec<RawImage>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub musiclogo: Vec<RawImage>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub musicarts: Vec<RawImage>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub hdmusicarts: Vec<RawImage>,
    #[serde(default, deserialize_with = "nullable_albums")]
    pub albums: Albums,
}

impl RawCatalog {
    /// 远程返回 404 时写入的空目录文档
    pub fn empty_document() -> Result<Vec<u8>, ArtworkError> {
        Ok(serde_json::to_vec(&RawCatalog::default())?)
    }

    /// 参与排序的图片总数
    pub fn image_count(&self) -> usize {
        self.artistthumb.len()
            + self.artistbackground.len()
            + self.hdmusiclogo.len()
            + self.musicbanner.len()
            + self.musiclogo.len()
            + self.musicarts.len()
            + self.hdmusicarts.len()
    }
}

/// 目录解析器
pub struct CatalogParser;

impl CatalogParser {
    /// 从内存数据解析目录
    pub fn parse_bytes(bytes: &[u8]) -> Result<RawCatalog, ArtworkError> {
        serde_json::from_slice(bytes).map_err(|e| ArtworkError::CorruptData(e.to_string()))
    }

    /// 从缓存文件解析目录
    ///
    /// # 返回
    /// - `Err(ArtworkError::NotFound)`: 缓存文件不存在
    /// - `Err(ArtworkError::CorruptData)`: 内容无法反序列化
    pub async fn parse(store: &CacheStore, path: &Path) -> Result<RawCatalog, ArtworkError> {
        let bytes = match store.read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArtworkError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        Self::parse_bytes(&bytes)
    }
}

fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// 专辑不参与排序，格式异常时忽略整个分组而不是让目录解析失败
fn nullable_albums<'de, D>(deserializer: D) -> Result<Albums, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(Albums::default());
    };

    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!("专辑数据格式异常，已忽略: {}", e);
        Albums::default()
    }))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(s) => s,
        Scalar::Number(n) => n.to_string(),
    }))
}
