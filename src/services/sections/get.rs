use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SectionService;
use crate::models::{ApiResponse, ErrorCode, sections::entities::SectionDetail};
use crate::services::not_found;

pub async fn get_section(
    service: &SectionService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(section) = storage.get_section_by_id(id).await? else {
        return Ok(not_found(ErrorCode::SectionNotFound, "Section not found"));
    };
    let student_count = storage.count_students_in_section(id).await? as i64;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SectionDetail {
            section,
            student_count,
        },
        "Section retrieved successfully",
    )))
}
