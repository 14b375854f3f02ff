use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, current_user, invalidate_user_cache, not_found};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple};

use super::AuthService;

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let current = current_user(request)?;

    // 邮箱格式与唯一性
    let email = update_data.email.map(|e| e.trim().to_string());
    if let Some(ref email) = email {
        if let Err(msg) = validate_email(email) {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }
        if let Some(existing) = storage.get_user_by_email(email).await?
            && existing.id != current.id
        {
            return Ok(conflict(
                ErrorCode::UserEmailAlreadyExists,
                "Email is already in use",
            ));
        }
    }

    // 新密码需符合密码策略
    let password_hash = match update_data.password {
        Some(password) => {
            if let Err(msg) = validate_password_simple(&password) {
                return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
            }
            let hash = tokio::task::spawn_blocking(move || hash_password(&password))
                .await
                .map_err(actix_web::error::ErrorInternalServerError)??;
            Some(hash)
        }
        None => None,
    };

    // 角色与状态不可自行修改
    let storage_update = UpdateUserRequest {
        email,
        password: password_hash,
        role: None,
        status: None,
        display_name: update_data.display_name,
        avatar_url: update_data.avatar_url,
    };

    match storage.update_user(current.id, storage_update).await? {
        Some(user) => {
            invalidate_user_cache(request, user.id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Profile updated successfully",
            )))
        }
        None => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
    }
}
