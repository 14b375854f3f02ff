use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TimetableService, check_conflict, check_references, conflict_response, normalize_input};
use crate::models::timetables::requests::{TimetableInput, UpdateTimetableRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::not_found;

/// 未提供时沿用原教室，显式传空串表示清除
pub(super) fn merge_room(requested: Option<String>, current: Option<String>) -> Option<String> {
    match requested {
        Some(room) if room.trim().is_empty() => None,
        Some(room) => Some(room),
        None => current,
    }
}

pub async fn update_timetable(
    service: &TimetableService,
    request: &HttpRequest,
    id: i64,
    data: UpdateTimetableRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(current) = storage.get_timetable_by_id(id).await? else {
        return Ok(not_found(ErrorCode::TimetableNotFound, "Timetable entry not found"));
    };

    // 在原条目上合并后整体校验
    let mut input = TimetableInput {
        section_id: data.section_id.unwrap_or(current.section_id),
        teacher_id: data.teacher_id.unwrap_or(current.teacher_id),
        subject: data.subject.unwrap_or(current.subject),
        day_of_week: data.day_of_week.unwrap_or(current.day_of_week),
        start_time: data.start_time.unwrap_or(current.start_time),
        end_time: data.end_time.unwrap_or(current.end_time),
        room: merge_room(data.room, current.room),
    };
    let slot = match normalize_input(&mut input) {
        Ok(slot) => slot,
        Err(resp) => return Ok(resp),
    };

    if let Some(resp) = check_references(&storage, &input).await? {
        return Ok(resp);
    }
    if let Some(conflict) = check_conflict(&storage, &input, slot, Some(id)).await? {
        return Ok(conflict_response(conflict));
    }

    match storage.update_timetable(id, input).await? {
        Some(entry) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            entry,
            "Timetable entry updated successfully",
        ))),
        None => Ok(not_found(ErrorCode::TimetableNotFound, "Timetable entry not found")),
    }
}
