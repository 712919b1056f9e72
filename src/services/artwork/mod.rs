// 图片解析模块 - 远程图片目录的获取、缓存与排序
//
// 本模块根据标识符解析远程图片目录，包括：
// - 目录缓存与新鲜度策略
// - 远程目录获取（404 写入空目录）
// - 目录解析与候选构建
// - 按宽度、语言、点赞数排序
// - 用户设置管理

pub mod builder;
pub mod catalog;
pub mod config;
pub mod config_manager;
pub mod error;
pub mod fetcher;
pub mod freshness;
pub mod fs;
pub mod path;
pub mod ranker;
pub mod resolver;

pub use builder::{
    CandidateBuilder, Category, ImageResult, ImageType, RatingType, UnknownImageType, PROVIDER_NAME,
};
pub use catalog::{Album, Albums, CatalogParser, RawCatalog, RawImage};
pub use config::{FanartSettings, ResolverConfig};
pub use config_manager::ConfigManager;
pub use error::{ArtworkError, FetchError};
pub use fetcher::{FetchOutcome, RemoteFetcher};
pub use freshness::FreshnessPolicy;
pub use fs::{CacheFileSystem, LocalFileSystem};
pub use path::CacheStore;
pub use ranker::{language_score, rank, RankKey};
pub use resolver::ArtworkResolver;
