use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::not_found;

pub async fn delete_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.delete_class(class_id).await? {
        info!("Class {} deleted", class_id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted successfully")))
    } else {
        Ok(not_found(ErrorCode::ClassNotFound, "Class not found"))
    }
}
