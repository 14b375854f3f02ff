use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SectionService, class_teacher_exists, validate_section_name};
use crate::models::{ApiResponse, ErrorCode, sections::requests::CreateSectionRequest};
use crate::services::{bad_request, conflict, not_found};

pub async fn create_section(
    service: &SectionService,
    request: &HttpRequest,
    class_id: i64,
    data: CreateSectionRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_section_name(&data.name) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if data.capacity < 1 {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "capacity must be at least 1",
        ));
    }

    let storage = service.get_storage(request)?;

    if storage.get_class_by_id(class_id).await?.is_none() {
        return Ok(not_found(ErrorCode::ClassNotFound, "Class not found"));
    }
    if storage
        .get_section_by_name(class_id, data.name.trim())
        .await?
        .is_some()
    {
        return Ok(conflict(
            ErrorCode::SectionAlreadyExists,
            format!("Section '{}' already exists in this class", data.name.trim()),
        ));
    }
    if !class_teacher_exists(&storage, data.class_teacher_id).await? {
        return Ok(bad_request(
            ErrorCode::TeacherNotFound,
            "Class teacher does not exist",
        ));
    }

    let section = storage.create_section(class_id, data).await?;
    info!("Section {} created in class {}", section.name, class_id);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        section,
        "Section created successfully",
    )))
}
