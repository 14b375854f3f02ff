use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ProgramService, validate_program_numbers};
use crate::models::{ApiResponse, ErrorCode, programs::requests::CreateProgramRequest};
use crate::services::{bad_request, conflict};
use crate::utils::validate::{validate_code, validate_required};

pub async fn create_program(
    service: &ProgramService,
    request: &HttpRequest,
    data: CreateProgramRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_required("name", &data.name, 100) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) = validate_code(&data.code) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) =
        validate_program_numbers(Some(data.duration_semesters), Some(data.fee_per_semester))
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;

    if storage.get_department_by_id(data.department_id).await?.is_none() {
        return Ok(bad_request(
            ErrorCode::DepartmentNotFound,
            "Department does not exist",
        ));
    }
    if storage.get_program_by_code(&data.code).await?.is_some() {
        return Ok(conflict(
            ErrorCode::ProgramAlreadyExists,
            "Program code already exists",
        ));
    }

    let program = storage.create_program(data).await?;
    info!("Program {} created", program.code);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        program,
        "Program created successfully",
    )))
}
