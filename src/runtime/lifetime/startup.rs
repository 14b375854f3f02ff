use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{CollegeHubError, Result};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;

const FALLBACK_CACHE: &str = "moka";
const ADMIN_USERNAME: &str = "admin";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 按名称构造缓存后端
async fn build_cache(name: &str) -> std::result::Result<Arc<dyn ObjectCache>, String> {
    let constructor = get_object_cache_plugin(name)
        .ok_or_else(|| format!("cache backend '{name}' is not registered"))?;
    constructor()
        .await
        .map(Arc::from)
        .map_err(|e| format!("failed to create {name} cache: {e}"))
}

/// 创建配置的缓存，失败时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();

    match build_cache(cache_type).await {
        Ok(cache) => {
            info!("Cache backend '{}' initialized", cache_type);
            return Ok(cache);
        }
        Err(e) if cache_type == FALLBACK_CACHE => {
            return Err(CollegeHubError::cache_plugin_not_found(e));
        }
        Err(e) => warn!("{}, falling back to {}", e, FALLBACK_CACHE),
    }

    build_cache(FALLBACK_CACHE)
        .await
        .map_err(CollegeHubError::cache_plugin_not_found)
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// 数据库中没有任何用户时创建默认管理员
async fn seed_admin(storage: &Arc<dyn Storage>) -> Result<()> {
    let count = storage.count_users().await?;
    if count > 0 {
        debug!("Database already has {} user(s), skipping admin seed", count);
        return Ok(());
    }

    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(password) if !password.is_empty() => password,
        _ => {
            let password = generate_random_password(16);
            // 只在首次启动时输出一次
            warn!("==========================================================");
            warn!("  ADMIN_PASSWORD not set, generated admin password: {}", password);
            warn!("  Save it now or set ADMIN_PASSWORD before first start");
            warn!("==========================================================");
            password
        }
    };

    let user = storage
        .create_user(CreateUserRequest {
            username: ADMIN_USERNAME.to_string(),
            email: "admin@collegehub.local".to_string(),
            password: hash_password(&password)?,
            role: UserRole::Admin,
            display_name: Some("Administrator".to_string()),
            avatar_url: None,
        })
        .await?;
    info!("Default admin account created (ID: {})", user.id);
    Ok(())
}

/// 准备服务器启动所需的存储与缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage().await?;
    info!("Storage initialized and migrations applied");

    let seeded = storage.ensure_default_roles().await?;
    if seeded > 0 {
        info!("Seeded {} built-in role(s)", seeded);
    }

    seed_admin(&storage).await?;

    let cache = create_cache().await?;

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_uses_charset() {
        let password = generate_random_password(24);
        assert_eq!(password.chars().count(), 24);
        assert!(password.chars().all(|c| c.is_ascii_graphic()));
        assert!(!password.contains('0') && !password.contains('O'));
    }
}
