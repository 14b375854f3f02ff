use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ProgramService, validate_program_numbers};
use crate::models::{ApiResponse, ErrorCode, programs::requests::UpdateProgramRequest};
use crate::services::{bad_request, conflict, not_found};
use crate::utils::validate::{validate_code, validate_required};

pub async fn update_program(
    service: &ProgramService,
    request: &HttpRequest,
    id: i64,
    data: UpdateProgramRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref name) = data.name
        && let Err(msg) = validate_required("name", name, 100)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) = validate_program_numbers(data.duration_semesters, data.fee_per_semester) {
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
    if let Some(ref code) = data.code {
        if let Err(msg) = validate_code(code) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }
        if let Some(existing) = storage.get_program_by_code(code).await?
            && existing.id != id
        {
            return Ok(conflict(
                ErrorCode::ProgramAlreadyExists,
                "Program code already exists",
            ));
        }
    }

    match storage.update_program(id, data).await? {
        Some(program) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            program,
            "Program updated successfully",
        ))),
        None => Ok(not_found(ErrorCode::ProgramNotFound, "Program not found")),
    }
}
