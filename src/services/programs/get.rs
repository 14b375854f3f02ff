use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProgramService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::not_found;

pub async fn get_program(
    service: &ProgramService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_program_by_id(id).await? {
        Some(program) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            program,
            "Program retrieved successfully",
        ))),
        None => Ok(not_found(ErrorCode::ProgramNotFound, "Program not found")),
    }
}
