// 远程图片元数据解析库
//
// 本库提供 fanart 图片解析的核心功能，包括：
// - API 路由
// - 外部 API 集成
// - 目录缓存与图片排序

pub mod api;
pub mod external;
pub mod services;
