// 候选图片构建
//
// 将原始目录中的每个分类映射为统一的 ImageResult：
// - 丢弃没有可用 URL 的条目
// - 将 http:// 升级为 https://
// - 按固定格式解析点赞数

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::services::artwork::catalog::{RawCatalog, RawImage};

/// 图片提供方名称
pub const PROVIDER_NAME: &str = "Fanart";

/// 面向调用方的图片类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageType {
    Primary,
    Backdrop,
    Logo,
    Banner,
    Art,
}

impl ImageType {
    pub fn as_str(&self) -> &str {
        match self {
            ImageType::Primary => "primary",
            ImageType::Backdrop => "backdrop",
            ImageType::Logo => "logo",
            ImageType::Banner => "banner",
            ImageType::Art => "art",
        }
    }

}

/// 无法识别的图片类型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("未知的图片类型: {0}")]
pub struct UnknownImageType(pub String);

/// 从字符串解析图片类型（忽略大小写）
impl FromStr for ImageType {
    type Err = UnknownImageType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(ImageType::Primary),
            "backdrop" => Ok(ImageType::Backdrop),
            "logo" => Ok(ImageType::Logo),
            "banner" => Ok(ImageType::Banner),
            "art" => Ok(ImageType::Art),
            _ => Err(UnknownImageType(s.to_string())),
        }
    }
}

/// 评分类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingType {
    Likes,
}

/// 目录中的图片分类，每个分类有固定的标称尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Background,
    Thumbnail,
    HdLogo,
    Banner,
    Logo,
    HdArt,
    Art,
}

impl Category {
    /// 构建顺序
    pub const ALL: [Category; 7] = [
        Category::Background,
        Category::Thumbnail,
        Category::HdLogo,
        Category::Banner,
        Category::Logo,
        Category::HdArt,
        Category::Art,
    ];

    /// 标称尺寸 (宽, 高)
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Category::Background => (1920, 1080),
            Category::Thumbnail => (500, 281),
            Category::HdLogo => (800, 310),
            Category::Banner => (1000, 185),
            Category::Logo => (400, 155),
            Category::HdArt => (1000, 562),
            Category::Art => (500, 281),
        }
    }

    pub fn image_type(&self) -> ImageType {
        match self {
            Category::Background => ImageType::Backdrop,
            Category::Thumbnail => ImageType::Primary,
            Category::HdLogo | Category::Logo => ImageType::Logo,
            Category::Banner => ImageType::Banner,
            Category::HdArt | Category::Art => ImageType::Art,
        }
    }

    pub fn images<'a>(&self, catalog: &'a RawCatalog) -> &'a [RawImage] {
        match self {
            Category::Background => &catalog.artistbackground,
            Category::Thumbnail => &catalog.artistthumb,
            Category::HdLogo => &catalog.hdmusiclogo,
            Category::Banner => &catalog.musicbanner,
            Category::Logo => &catalog.musiclogo,
            Category::HdArt => &catalog.hdmusicarts,
            Category::Art => &catalog.musicarts,
        }
    }
}

/// 标准化后的图片结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    pub category: Category,
    pub image_type: ImageType,
    /// 已升级为 https 的地址，永不为空
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub provider_name: String,
    pub language: Option<String>,
    /// 点赞数，仅在原始值能解析为整数时存在
    pub community_rating: Option<i32>,
    pub vote_count: Option<i32>,
    pub rating_type: RatingType,
}

/// 候选图片构建器
pub struct CandidateBuilder;

impl CandidateBuilder {
    /// 按固定分类顺序构建全部图片结果
    pub fn build_results(catalog: &RawCatalog) -> Vec<ImageResult> {
        let mut results = Vec::with_capacity(catalog.image_count());

        for category in Category::ALL {
            results.extend(
                category
                    .images(catalog)
                    .iter()
                    .filter_map(|image| Self::build_one(category, image)),
            );
        }

        results
    }

    fn build_one(category: Category, image: &RawImage) -> Option<ImageResult> {
        let url = image.url.as_deref().filter(|u| !u.trim().is_empty())?;
        let (width, height) = category.dimensions();

        Some(ImageResult {
            category,
            image_type: category.image_type(),
            url: upgrade_to_https(url),
            width: Some(width),
            height: Some(height),
            provider_name: PROVIDER_NAME.to_string(),
            language: image.lang.clone(),
            community_rating: image.likes.as_deref().and_then(parse_invariant_int),
            vote_count: None,
            rating_type: RatingType::Likes,
        })
    }
}

/// 将 http:// 协议（忽略大小写）改写为 https://
pub fn upgrade_to_https(url: &str) -> String {
    const INSECURE: &str = "http://";

    match url.get(..INSECURE.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(INSECURE) => {
            format!("https://{}", &url[INSECURE.len()..])
        }
        _ => url.to_string(),
    }
}

/// 与区域设置无关的整数解析：允许首尾空白和前导符号
pub fn parse_invariant_int(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<i32>().ok()
}
