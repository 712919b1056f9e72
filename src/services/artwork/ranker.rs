// 图片排序
//
// 多键稳定降序排序：宽度 > 语言匹配度 > 点赞数 > 投票数

use std::cmp::Reverse;

use crate::services::artwork::builder::ImageResult;

/// 排序键，每次排序时重新计算
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RankKey {
    pub width: u32,
    pub language_score: u8,
    pub community_rating: i32,
    pub vote_count: i32,
}

impl RankKey {
    pub fn of(result: &ImageResult, preferred_language: Option<&str>) -> Self {
        Self {
            width: result.width.unwrap_or(0),
            language_score: language_score(result.language.as_deref(), preferred_language),
            community_rating: result.community_rating.unwrap_or(0),
            vote_count: result.vote_count.unwrap_or(0),
        }
    }
}

/// 语言匹配度
///
/// - 3: 与首选语言相同（忽略大小写，两者都为空也算相同）
/// - 2: 首选语言不是英语，而图片为英语
/// - 无语言标记：首选语言为英语时 3，否则 2
/// - 0: 其他
///
/// 无语言标记在非英语场景下与英语同分，保持现有排序行为
pub fn language_score(language: Option<&str>, preferred_language: Option<&str>) -> u8 {
    let preferred_is_english = preferred_language.is_some_and(|l| l.eq_ignore_ascii_case("en"));

    if same_language(language, preferred_language) {
        return 3;
    }

    if !preferred_is_english && language.is_some_and(|l| l.eq_ignore_ascii_case("en")) {
        return 2;
    }

    if language.map_or(true, str::is_empty) {
        return if preferred_is_english { 3 } else { 2 };
    }

    0
}

fn same_language(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}

/// 按排序键降序排列，键相同时保持输入顺序
pub fn rank(mut results: Vec<ImageResult>, preferred_language: Option<&str>) -> Vec<ImageResult> {
    // sort_by_key 是稳定排序
    results.sort_by_key(|result| Reverse(RankKey::of(result, preferred_language)));
    results
}
