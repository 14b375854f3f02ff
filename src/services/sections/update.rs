use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SectionService, class_teacher_exists, validate_section_name};
use crate::models::{ApiResponse, ErrorCode, sections::requests::UpdateSectionRequest};
use crate::services::{bad_request, conflict, not_found};

pub async fn update_section(
    service: &SectionService,
    request: &HttpRequest,
    id: i64,
    data: UpdateSectionRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref name) = data.name
        && let Err(msg) = validate_section_name(name)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;

    let Some(section) = storage.get_section_by_id(id).await? else {
        return Ok(not_found(ErrorCode::SectionNotFound, "Section not found"));
    };

    if let Some(ref name) = data.name
        && let Some(existing) = storage.get_section_by_name(section.class_id, name.trim()).await?
        && existing.id != id
    {
        return Ok(conflict(
            ErrorCode::SectionAlreadyExists,
            "Section name already exists in this class",
        ));
    }

    // 容量不能低于当前人数
    if let Some(capacity) = data.capacity {
        if capacity < 1 {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                "capacity must be at least 1",
            ));
        }
        let enrolled = storage.count_students_in_section(id).await?;
        if (capacity as u64) < enrolled {
            return Ok(conflict(
                ErrorCode::SectionFull,
                format!("Section already has {enrolled} student(s)"),
            ));
        }
    }

    if !class_teacher_exists(&storage, data.class_teacher_id).await? {
        return Ok(bad_request(
            ErrorCode::TeacherNotFound,
            "Class teacher does not exist",
        ));
    }

    match storage.update_section(id, data).await? {
        Some(section) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            section,
            "Section updated successfully",
        ))),
        None => Ok(not_found(ErrorCode::SectionNotFound, "Section not found")),
    }
}
