use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TimetableService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::not_found;

pub async fn delete_timetable(
    service: &TimetableService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.delete_timetable(id).await? {
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Timetable entry deleted successfully",
        )))
    } else {
        Ok(not_found(ErrorCode::TimetableNotFound, "Timetable entry not found"))
    }
}
