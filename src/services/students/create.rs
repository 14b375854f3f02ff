use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, check_enrollment, validate_profile};
use crate::models::{ApiResponse, ErrorCode, students::requests::CreateStudentRequest};
use crate::services::{bad_request, conflict};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

pub async fn create_student(
    service: &StudentService,
    request: &HttpRequest,
    mut data: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    data.username = data.username.trim().to_string();
    data.email = data.email.trim().to_string();
    data.roll_number = data.roll_number.trim().to_string();

    if let Err(msg) = validate_username(&data.username) {
        return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
    }
    if let Err(msg) = validate_email(&data.email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = validate_password_simple(&data.password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }
    if let Err(msg) = validate_profile(
        Some(&data.roll_number),
        data.date_of_birth.as_deref(),
        data.admission_date.as_deref(),
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;

    if let Some(err) = check_enrollment(
        &storage,
        data.program_id,
        data.class_id,
        data.section_id,
        None,
    )
    .await?
    {
        return Ok(err.into_response());
    }
    if storage.get_user_by_username(&data.username).await?.is_some() {
        return Ok(conflict(ErrorCode::UserAlreadyExists, "Username already exists"));
    }
    if storage.get_user_by_email(&data.email).await?.is_some() {
        return Ok(conflict(ErrorCode::UserEmailAlreadyExists, "Email already exists"));
    }
    if !storage
        .check_roll_numbers_exist(std::slice::from_ref(&data.roll_number))
        .await?
        .is_empty()
    {
        return Ok(conflict(
            ErrorCode::StudentAlreadyExists,
            format!("Roll number '{}' already exists", data.roll_number),
        ));
    }

    let password = std::mem::take(&mut data.password);
    data.password = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(actix_web::error::ErrorInternalServerError)??;

    let student = storage.create_student(data).await?;
    info!(
        "Student {} enrolled with account {}",
        student.student.roll_number, student.user.username
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(
        student,
        "Student created successfully",
    )))
}
