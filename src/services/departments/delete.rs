use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DepartmentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{conflict, not_found};

pub async fn delete_department(
    service: &DepartmentService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.get_department_by_id(id).await?.is_none() {
        return Ok(not_found(ErrorCode::DepartmentNotFound, "Department not found"));
    }

    let programs = storage.count_programs_in_department(id).await?;
    if programs > 0 {
        return Ok(conflict(
            ErrorCode::DepartmentInUse,
            format!("Department still has {programs} program(s)"),
        ));
    }

    storage.delete_department(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Department deleted successfully")))
}
