use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DepartmentService, head_teacher_exists};
use crate::models::{ApiResponse, ErrorCode, departments::requests::UpdateDepartmentRequest};
use crate::services::{bad_request, conflict, not_found};
use crate::utils::validate::{validate_code, validate_required};

pub async fn update_department(
    service: &DepartmentService,
    request: &HttpRequest,
    id: i64,
    data: UpdateDepartmentRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref name) = data.name
        && let Err(msg) = validate_required("name", name, 100)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;

    if let Some(ref code) = data.code {
        if let Err(msg) = validate_code(code) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }
        if let Some(existing) = storage.get_department_by_code(code).await?
            && existing.id != id
        {
            return Ok(conflict(
                ErrorCode::DepartmentAlreadyExists,
                "Department code already exists",
            ));
        }
    }
    if !head_teacher_exists(&storage, data.head_teacher_id).await? {
        return Ok(bad_request(
            ErrorCode::TeacherNotFound,
            "Head teacher does not exist",
        ));
    }

    match storage.update_department(id, data).await? {
        Some(department) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            department,
            "Department updated successfully",
        ))),
        None => Ok(not_found(ErrorCode::DepartmentNotFound, "Department not found")),
    }
}
