// 缓存新鲜度策略

use chrono::{DateTime, Duration, Utc};

/// 新鲜度策略：缓存超过固定时长后需要重新获取
#[derive(Debug, Clone, Copy, Default)]
pub struct FreshnessPolicy;

impl FreshnessPolicy {
    /// 过期阈值（天）
    pub const STALE_AFTER_DAYS: i64 = 2;

    pub fn stale_after(&self) -> Duration {
        Duration::days(Self::STALE_AFTER_DAYS)
    }

    /// 判断是否需要刷新
    ///
    /// - 缓存不存在：需要刷新
    /// - 缓存年龄超过阈值：需要刷新
    /// - 时钟偏差导致年龄为负：视为新鲜
    pub fn needs_refresh(&self, last_modified: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_modified {
            None => true,
            Some(modified) => now.signed_duration_since(modified) > self.stale_after(),
        }
    }
}
