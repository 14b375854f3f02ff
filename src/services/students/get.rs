use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, not_found};

pub async fn get_student(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_student_by_id(id).await? {
        Some(student) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student retrieved successfully",
        ))),
        None => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
    }
}

pub async fn get_my_student(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    match storage.get_student_by_user_id(user.id).await? {
        Some(student) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student profile retrieved successfully",
        ))),
        None => Ok(not_found(
            ErrorCode::StudentNotFound,
            "No student profile is linked to this account",
        )),
    }
}
