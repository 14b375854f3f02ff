use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, validate_semester};
use crate::models::classes::requests::CreateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict};
use crate::utils::validate::{validate_academic_year, validate_code, validate_required};

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_required("name", &class_data.name, 100) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) = validate_code(&class_data.code) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) = validate_academic_year(&class_data.academic_year) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;

    let Some(program) = storage.get_program_by_id(class_data.program_id).await? else {
        return Ok(bad_request(ErrorCode::ProgramNotFound, "Program does not exist"));
    };
    if let Err(msg) = validate_semester(class_data.semester, &program) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if storage.get_class_by_code(&class_data.code).await?.is_some() {
        return Ok(conflict(
            ErrorCode::ClassAlreadyExists,
            "Class code already exists",
        ));
    }

    let class = storage.create_class(class_data).await?;
    info!("Class {} created in program {}", class.code, program.code);
    Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created successfully")))
}
