use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SectionService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::not_found;

pub async fn list_sections(
    service: &SectionService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.get_class_by_id(class_id).await?.is_none() {
        return Ok(not_found(ErrorCode::ClassNotFound, "Class not found"));
    }

    let sections = storage.list_sections_by_class(class_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        sections,
        "Section list retrieved successfully",
    )))
}
