use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProgramService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{conflict, not_found};

pub async fn delete_program(
    service: &ProgramService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.get_program_by_id(id).await?.is_none() {
        return Ok(not_found(ErrorCode::ProgramNotFound, "Program not found"));
    }

    let classes = storage.count_classes_in_program(id).await?;
    let students = storage.count_students_in_program(id).await?;
    if classes > 0 || students > 0 {
        return Ok(conflict(
            ErrorCode::ProgramInUse,
            format!("Program still has {classes} class(es) and {students} student(s)"),
        ));
    }

    storage.delete_program(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Program deleted successfully")))
}
