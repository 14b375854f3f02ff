pub mod rate_limit;
pub mod require_jwt;
pub mod require_permission;
pub mod require_role;

pub use rate_limit::RateLimit;
pub use require_jwt::RequireJWT;
pub use require_permission::RequirePermission;
pub use require_role::RequireRole;

use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};

use crate::models::{ApiResponse, ErrorCode};

/// 中间件拒绝请求时的统一响应
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    match status {
        StatusCode::NO_CONTENT => HttpResponse::build(status).finish(),
        _ => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(ApiResponse::<()>::error_empty(code, message)),
    }
}

/// 用户缓存键，账号变更时需移除
pub fn user_cache_key(user_id: i64) -> String {
    format!("user:{user_id}")
}

/// 角色缓存键，权限更新时需移除
pub fn role_cache_key(role: crate::models::users::entities::UserRole) -> String {
    format!("role:{role}")
}
