use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{DepartmentService, head_teacher_exists};
use crate::models::{ApiResponse, ErrorCode, departments::requests::CreateDepartmentRequest};
use crate::services::{bad_request, conflict};
use crate::utils::validate::{validate_code, validate_required};

pub async fn create_department(
    service: &DepartmentService,
    request: &HttpRequest,
    data: CreateDepartmentRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_required("name", &data.name, 100) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) = validate_code(&data.code) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;

    if storage.get_department_by_code(&data.code).await?.is_some() {
        return Ok(conflict(
            ErrorCode::DepartmentAlreadyExists,
            format!("Department code '{}' already exists", data.code.trim().to_uppercase()),
        ));
    }
    if !head_teacher_exists(&storage, data.head_teacher_id).await? {
        return Ok(bad_request(
            ErrorCode::TeacherNotFound,
            "Head teacher does not exist",
        ));
    }

    let department = storage.create_department(data).await?;
    info!("Department {} created", department.code);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        department,
        "Department created successfully",
    )))
}
