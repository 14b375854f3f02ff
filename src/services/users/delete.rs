use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, invalidate_user_cache, not_found};

/// 内置管理员账号
const ROOT_USER_ID: i64 = 1;

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = current_user(request)?;

    // 禁止删除内置管理员和当前用户
    if user_id == current.id || user_id == ROOT_USER_ID {
        return Ok(bad_request(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete the current user or the built-in administrator",
        ));
    }

    let storage = service.get_storage(request)?;
    if storage.delete_user(user_id).await? {
        invalidate_user_cache(request, user_id).await;
        tracing::info!("User {} deleted by {}", user_id, current.id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
    } else {
        Ok(not_found(ErrorCode::UserNotFound, "User not found"))
    }
}
