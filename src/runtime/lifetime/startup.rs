use crate::cache::ObjectCache;
use crate::cache::register::{get_object_cache_plugin, registered_object_cache_plugins};
use crate::config::AppConfig;
use crate::errors::{DojoError, Result};
use crate::models::branches::requests::CreateBranchRequest;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

// 内置的缓存后端
const FALLBACK_CACHE: &str = "moka";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let config = AppConfig::get();
    let cache_type = config.cache.cache_type.as_str();

    warn!("Attempting to create {} cache backend", cache_type);

    let mut candidates = vec![cache_type];
    if cache_type != FALLBACK_CACHE {
        candidates.push(FALLBACK_CACHE);
    }

    for name in candidates {
        let Some(constructor) = get_object_cache_plugin(name) else {
            warn!("Cache backend '{}' not found in registry", name);
            continue;
        };
        match constructor().await {
            Ok(cache) => {
                warn!("Successfully created {} cache backend", name);
                return Ok(Arc::from(cache));
            }
            Err(e) => warn!("Failed to create {} cache: {}", name, e),
        }
    }

    Err(DojoError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {cache_type}, registered: {})",
        registered_object_cache_plugins().join(", ")
    )))
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 用户表为空时创建默认管理员
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 优先使用环境变量中的密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreateUserRequest {
        username: "admin".to_string(),
        email: "admin@localhost.localdomain".to_string(),
        password: password_hash,
        role: UserRole::Admin,
        display_name: Some("Administrator".to_string()),
        phone: None,
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, username: {})",
                user.id, user.username
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 没有任何分馆时创建一个以系统名命名的默认分馆，学员必须归属于分馆
async fn seed_branch(storage: &Arc<dyn Storage>) {
    match storage.list_branches().await {
        Ok(branches) if !branches.is_empty() => return,
        Ok(_) => {}
        Err(e) => {
            warn!("Failed to list branches: {}, skipping branch seed", e);
            return;
        }
    }

    let request = CreateBranchRequest {
        name: AppConfig::get().app.system_name.clone(),
        address: None,
        phone: None,
        email: None,
    };

    match storage.create_branch(request).await {
        Ok(branch) => info!("Default branch created: {} (ID: {})", branch.name, branch.id),
        Err(e) => warn!("Failed to create default branch: {}", e),
    }
}

/// 准备服务器启动的上下文：存储（含迁移）、初始数据和缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    debug!(
        "Registered cache backends: {:?}",
        registered_object_cache_plugins()
    );

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;
    seed_branch(&storage).await;

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}
