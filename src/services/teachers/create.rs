use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TeacherService, validate_profile};
use crate::models::{ApiResponse, ErrorCode, teachers::requests::CreateTeacherRequest};
use crate::services::{bad_request, conflict};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

pub async fn create_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    mut data: CreateTeacherRequest,
) -> ActixResult<HttpResponse> {
    data.username = data.username.trim().to_string();
    data.email = data.email.trim().to_string();
    data.employee_id = data.employee_id.trim().to_string();

    if let Err(msg) = validate_username(&data.username) {
        return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
    }
    if let Err(msg) = validate_email(&data.email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = validate_password_simple(&data.password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }
    if let Err(msg) = validate_profile(Some(&data.employee_id), data.joining_date.as_deref()) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;

    if let Some(department_id) = data.department_id
        && storage.get_department_by_id(department_id).await?.is_none()
    {
        return Ok(bad_request(
            ErrorCode::DepartmentNotFound,
            "Department does not exist",
        ));
    }
    if storage.get_user_by_username(&data.username).await?.is_some() {
        return Ok(conflict(ErrorCode::UserAlreadyExists, "Username already exists"));
    }
    if storage.get_user_by_email(&data.email).await?.is_some() {
        return Ok(conflict(ErrorCode::UserEmailAlreadyExists, "Email already exists"));
    }
    if !storage
        .check_employee_ids_exist(std::slice::from_ref(&data.employee_id))
        .await?
        .is_empty()
    {
        return Ok(conflict(
            ErrorCode::TeacherAlreadyExists,
            format!("Employee ID '{}' already exists", data.employee_id),
        ));
    }

    let password = std::mem::take(&mut data.password);
    data.password = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(actix_web::error::ErrorInternalServerError)??;

    let teacher = storage.create_teacher(data).await?;
    info!(
        "Teacher {} created with account {}",
        teacher.teacher.employee_id, teacher.user.username
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(
        teacher,
        "Teacher created successfully",
    )))
}
