use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::RoleService;
use crate::middlewares::role_cache_key;
use crate::models::{
    ApiResponse, ErrorCode, roles::requests::UpdateRoleRequest, users::entities::UserRole,
};
use crate::services::{bad_request, cache_from, current_user, not_found};

pub async fn update_role(
    service: &RoleService,
    name: UserRole,
    mut update: UpdateRoleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = current_user(request)?;

    if let Some(ref mut display_name) = update.display_name {
        *display_name = display_name.trim().to_string();
        if display_name.is_empty() || display_name.chars().count() > 64 {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                "Display name must be 1-64 characters",
            ));
        }
    }

    // 管理员权限列表不可清空
    if name == UserRole::Admin && update.permissions.as_ref().is_some_and(|p| p.is_empty()) {
        return Ok(bad_request(
            ErrorCode::RolePermissionInvalid,
            "Administrator permissions cannot be emptied",
        ));
    }

    let storage = service.get_storage(request)?;
    let Some(role) = storage.update_role(name, update).await? else {
        return Ok(not_found(ErrorCode::RoleNotFound, "Role not found"));
    };

    if let Some(cache) = cache_from(request) {
        cache.remove(&role_cache_key(name)).await;
    }
    info!(
        "Role '{}' updated by user {}: [{}]",
        name,
        current.id,
        role.permissions
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(role, "Role updated successfully")))
}
