use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SectionService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::not_found;

pub async fn delete_section(
    service: &SectionService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.delete_section(id).await? {
        tracing::info!("Section {} deleted", id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Section deleted successfully")))
    } else {
        Ok(not_found(ErrorCode::SectionNotFound, "Section not found"))
    }
}
