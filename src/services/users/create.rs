use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::{bad_request, conflict};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    user_data.username = user_data.username.trim().to_string();
    user_data.email = user_data.email.trim().to_string();

    // 验证用户名
    if let Err(msg) = validate_username(&user_data.username) {
        return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
    }

    // 验证邮箱
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }

    // 密码策略
    if let Err(msg) = validate_password_simple(&user_data.password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }

    let storage = service.get_storage(request)?;

    if storage
        .get_user_by_username(&user_data.username)
        .await?
        .is_some()
    {
        return Ok(conflict(
            ErrorCode::UserAlreadyExists,
            "Username already exists",
        ));
    }
    if storage.get_user_by_email(&user_data.email).await?.is_some() {
        return Ok(conflict(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ));
    }

    let password = std::mem::take(&mut user_data.password);
    user_data.password = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(actix_web::error::ErrorInternalServerError)??;

    let user = storage.create_user(user_data).await?;
    info!("User {} created with role {}", user.username, user.role);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        UserResponse { user },
        "User created successfully",
    )))
}
