/*!
 * 基于权限点的访问控制中间件
 *
 * 必须位于 RequireJWT 之后。当前用户角色的权限列表从缓存读取，未命中时查库并回填；
 * 管理员始终放行。
 *
 * ```rust,ignore
 * web::resource("/fees/{id}/payments")
 *     .wrap(RequirePermission::new(Permission::FeesCollect))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{info, warn};

use super::{create_error_response, role_cache_key};
use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::errors::{CollegeHubError, Result};
use crate::models::{
    ErrorCode,
    roles::entities::{Permission, Role},
    users::entities::{User, UserRole},
};
use crate::storage::Storage;

/// 加载角色，优先读缓存
pub async fn load_role(
    storage: &Arc<dyn Storage>,
    cache: Option<&Arc<dyn ObjectCache>>,
    name: UserRole,
) -> Result<Option<Role>> {
    let key = role_cache_key(name);
    if let Some(cache) = cache
        && let CacheResult::Found(role) = cache.get::<Role>(&key).await
    {
        return Ok(Some(role));
    }

    let role = storage.get_role(name).await?;
    if let (Some(cache), Some(role)) = (cache, role.as_ref()) {
        cache
            .insert(key, role, AppConfig::get().cache.default_ttl)
            .await;
    }
    Ok(role)
}

/// 判断角色是否拥有某权限
pub async fn role_has_permission(
    storage: &Arc<dyn Storage>,
    cache: Option<&Arc<dyn ObjectCache>>,
    role: UserRole,
    permission: Permission,
) -> Result<bool> {
    if role == UserRole::Admin {
        return Ok(true);
    }
    Ok(load_role(storage, cache, role)
        .await?
        .is_some_and(|r| r.allows(permission)))
}

#[derive(Clone)]
pub struct RequirePermission {
    permission: Permission,
}

impl RequirePermission {
    pub fn new(permission: Permission) -> Self {
        Self { permission }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequirePermission
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequirePermissionMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequirePermissionMiddleware {
            service: Rc::new(service),
            permission: self.permission,
        }))
    }
}

pub struct RequirePermissionMiddleware<S> {
    service: Rc<S>,
    permission: Permission,
}

async fn check(req: &ServiceRequest, role: UserRole, permission: Permission) -> Result<bool> {
    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| CollegeHubError::database_config("Storage not configured"))?
        .get_ref()
        .clone();
    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone());

    role_has_permission(&storage, cache.as_ref(), role, permission).await
}

impl<S, B> Service<ServiceRequest> for RequirePermissionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let permission = self.permission;

        Box::pin(async move {
            let current = req
                .extensions()
                .get::<User>()
                .map(|user| (user.id, user.role));

            let Some((user_id, role)) = current else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            match check(&req, role, permission).await {
                Ok(true) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Ok(false) => {
                    info!(
                        "Permission '{}' denied for user {} (role: {})",
                        permission, user_id, role
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            &format!("Missing permission: {permission}"),
                        )
                        .map_into_right_body(),
                    ))
                }
                Err(e) => {
                    warn!("Permission check failed: {}", e);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            "Permission check failed",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::models::roles::requests::UpdateRoleRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[tokio::test]
    async fn test_role_permissions_are_cached_until_invalidated() {
        let sea = SeaOrmStorage::in_memory().await;
        sea.ensure_default_roles_impl().await.unwrap();
        let storage: Arc<dyn Storage> = Arc::new(sea);
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(100, 60));

        assert!(
            role_has_permission(&storage, Some(&cache), UserRole::Staff, Permission::FeesCollect)
                .await
                .unwrap()
        );

        storage
            .update_role(
                UserRole::Staff,
                UpdateRoleRequest {
                    display_name: None,
                    description: None,
                    permissions: Some(vec![Permission::DashboardView]),
                },
            )
            .await
            .unwrap();

        // 缓存未失效前仍为旧权限
        assert!(
            role_has_permission(&storage, Some(&cache), UserRole::Staff, Permission::FeesCollect)
                .await
                .unwrap()
        );

        cache.remove(&role_cache_key(UserRole::Staff)).await;
        assert!(
            !role_has_permission(&storage, Some(&cache), UserRole::Staff, Permission::FeesCollect)
                .await
                .unwrap()
        );

        // 管理员不查库
        assert!(
            role_has_permission(&storage, None, UserRole::Admin, Permission::FeesManage)
                .await
                .unwrap()
        );
    }
}
