use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RoleService;
use crate::middlewares::require_permission::load_role;
use crate::models::{ApiResponse, ErrorCode, users::entities::UserRole};
use crate::services::{cache_from, not_found};

pub async fn get_role(
    service: &RoleService,
    name: UserRole,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let cache = cache_from(request);

    match load_role(&storage, cache.as_ref(), name).await? {
        Some(role) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            role,
            "Role retrieved successfully",
        ))),
        None => Ok(not_found(ErrorCode::RoleNotFound, "Role not found")),
    }
}
