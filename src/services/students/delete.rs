use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{invalidate_user_cache, not_found};

pub async fn delete_student(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(student) = storage.get_student_by_id(id).await? else {
        return Ok(not_found(ErrorCode::StudentNotFound, "Student not found"));
    };

    // 考勤与费用记录随学生级联删除
    if !storage.delete_student(id).await? {
        return Ok(not_found(ErrorCode::StudentNotFound, "Student not found"));
    }
    invalidate_user_cache(request, student.user.id).await;
    info!(
        "Student {} and account {} deleted",
        student.student.roll_number, student.user.username
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student deleted successfully")))
}
