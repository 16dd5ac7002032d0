//! 缓存层
//!
//! JWT 中间件用它缓存 token -> 用户 的查找结果，减少每次请求的数据库往返。
//! 支持 Moka（进程内）与 Redis 两种后端，由配置 `cache.type` 选择；
//! Redis 不可用时回退到 Moka。

pub mod object_cache;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::errors::Result;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端暂时不可用等情况，调用方按未命中处理
    Unavailable,
}

/// 对象缓存统一接口
#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 按配置构建缓存后端
pub async fn create_cache() -> Result<Box<dyn ObjectCache>> {
    let config = AppConfig::get();

    match config.cache.cache_type.as_str() {
        "redis" => match object_cache::redis::RedisObjectCache::new() {
            Ok(cache) => Ok(Box::new(cache)),
            Err(e) => {
                tracing::warn!("Redis cache unavailable ({}), falling back to Moka", e);
                Ok(Box::new(object_cache::moka::MokaObjectCache::new()))
            }
        },
        _ => Ok(Box::new(object_cache::moka::MokaObjectCache::new())),
    }
}
