use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{invalidate_user_cache, not_found};

pub async fn delete_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(teacher) = storage.get_teacher_by_id(id).await? else {
        return Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found"));
    };

    if !storage.delete_teacher(id).await? {
        return Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found"));
    }
    invalidate_user_cache(request, teacher.user.id).await;
    info!(
        "Teacher {} and account {} deleted",
        teacher.teacher.employee_id, teacher.user.username
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Teacher deleted successfully")))
}
