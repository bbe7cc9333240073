//! 缓存后端插件表
//!
//! 各后端通过 [`declare_object_cache_plugin!`](crate::declare_object_cache_plugin)
//! 在程序加载时登记构造函数，启动时按配置的名称取用。

use crate::cache::ObjectCache;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::{
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

static OBJECT_CACHE_REGISTRY: Lazy<RwLock<BTreeMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(BTreeMap::new()));

// 登记只在加载期发生，锁中毒时表内数据仍然可用
fn read_registry() -> RwLockReadGuard<'static, BTreeMap<String, ObjectCacheConstructor>> {
    OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_registry() -> RwLockWriteGuard<'static, BTreeMap<String, ObjectCacheConstructor>> {
    OBJECT_CACHE_REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    let name = name.into();
    if write_registry().insert(name.clone(), constructor).is_some() {
        tracing::warn!("Cache plugin '{}' registered twice, keeping the latest", name);
    }
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    read_registry().get(name).cloned()
}

/// 已登记的后端名称（按字母序）
pub fn registered_object_cache_plugins() -> Vec<String> {
    read_registry().keys().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moka_is_registered_at_load() {
        assert!(registered_object_cache_plugins().contains(&"moka".to_string()));
        assert!(get_object_cache_plugin("moka").is_some());
        assert!(get_object_cache_plugin("memcached").is_none());
    }

    #[tokio::test]
    async fn test_registered_constructor_builds_cache() {
        let constructor = get_object_cache_plugin("moka").unwrap();
        let cache = constructor().await.unwrap();
        cache.insert_raw("belt".to_string(), "Yellow".to_string(), 0).await;
        assert!(matches!(
            cache.get_raw("belt").await,
            crate::cache::CacheResult::Found(ref v) if v == "Yellow"
        ));
    }
}
