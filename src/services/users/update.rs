use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::UpdateUserRequest, responses::UserResponse},
};
use crate::services::{
    bad_request, conflict, current_user, invalidate_user_cache, not_found,
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 不能修改自己的角色或状态
    if user_id == current.id
        && (update_data.role.is_some_and(|r| r != current.role)
            || update_data.status.is_some_and(|s| s != current.status))
    {
        return Ok(bad_request(
            ErrorCode::UserUpdateFailed,
            "Cannot change your own role or status",
        ));
    }

    if let Some(ref mut email) = update_data.email {
        *email = email.trim().to_string();
        if let Err(msg) = validate_email(email) {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }
        if let Some(existing) = storage.get_user_by_email(email).await?
            && existing.id != user_id
        {
            return Ok(conflict(
                ErrorCode::UserEmailAlreadyExists,
                "Email already exists",
            ));
        }
    }

    if let Some(password) = update_data.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
        }
        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(actix_web::error::ErrorInternalServerError)??;
        update_data.password = Some(hash);
    }

    match storage.update_user(user_id, update_data).await? {
        Some(user) => {
            invalidate_user_cache(request, user_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "User information updated successfully",
            )))
        }
        None => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
    }
}
