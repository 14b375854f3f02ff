use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, validate_semester};
use crate::models::classes::requests::UpdateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, not_found};
use crate::utils::validate::{validate_academic_year, validate_code, validate_required};

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref name) = update_data.name
        && let Err(msg) = validate_required("name", name, 100)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Some(ref year) = update_data.academic_year
        && let Err(msg) = validate_academic_year(year)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;

    let Some(class) = storage.get_class_by_id(class_id).await? else {
        return Ok(not_found(ErrorCode::ClassNotFound, "Class not found"));
    };

    if let Some(semester) = update_data.semester {
        let Some(program) = storage.get_program_by_id(class.program_id).await? else {
            return Ok(not_found(ErrorCode::ProgramNotFound, "Program not found"));
        };
        if let Err(msg) = validate_semester(semester, &program) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }
    }
    if let Some(ref code) = update_data.code {
        if let Err(msg) = validate_code(code) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }
        if let Some(existing) = storage.get_class_by_code(code).await?
            && existing.id != class_id
        {
            return Ok(conflict(
                ErrorCode::ClassAlreadyExists,
                "Class code already exists",
            ));
        }
    }

    match storage.update_class(class_id, update_data).await? {
        Some(class) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            class,
            "Class updated successfully",
        ))),
        None => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
    }
}
