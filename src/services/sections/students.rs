use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SectionService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::not_found;

/// 分班内的在读学生，按学号排序
pub async fn list_section_students(
    service: &SectionService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.get_section_by_id(id).await?.is_none() {
        return Ok(not_found(ErrorCode::SectionNotFound, "Section not found"));
    }

    let students = storage.list_students_in_section(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        students,
        "Section students retrieved successfully",
    )))
}
