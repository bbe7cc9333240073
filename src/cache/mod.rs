//! 对象缓存
//!
//! 后端以插件形式注册（见 [`register`]），启动时按 `cache.type` 选择。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为秒，0 表示使用后端默认值
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 以 JSON 形式读写任意对象
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> CacheResult<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(raw) => match serde_json::from_str(&raw) {
            Ok(value) => CacheResult::Found(value),
            Err(_) => {
                cache.remove(key).await;
                CacheResult::NotFound
            }
        },
        CacheResult::NotFound => CacheResult::NotFound,
        CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
    }
}

pub async fn insert_json<T: Serialize + Sync>(
    cache: &dyn ObjectCache,
    key: String,
    value: &T,
    ttl: u64,
) {
    match serde_json::to_string(value) {
        Ok(raw) => cache.insert_raw(key, raw, ttl).await,
        Err(e) => tracing::warn!("Failed to serialize cache entry {}: {}", key, e),
    }
}

/// 声明缓存插件，在程序加载时注册到插件表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ident) => {
        paste::paste! {
            #[ctor::ctor]
            fn [<register_ $ty:snake _plugin>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    std::sync::Arc::new(|| {
                        Box::pin(async {
                            $ty::new()
                                .map(|cache| {
                                    Box::new(cache) as Box<dyn $crate::cache::ObjectCache>
                                })
                                .map_err($crate::errors::DojoError::cache_connection)
                        })
                    }),
                );
            }
        }
    };
}
