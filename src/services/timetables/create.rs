use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TimetableService, check_conflict, check_references, conflict_response, normalize_input};
use crate::models::ApiResponse;
use crate::models::timetables::requests::{CreateTimetableRequest, TimetableInput};

pub async fn create_timetable(
    service: &TimetableService,
    request: &HttpRequest,
    data: CreateTimetableRequest,
) -> ActixResult<HttpResponse> {
    let mut input = TimetableInput {
        section_id: data.section_id,
        teacher_id: data.teacher_id,
        subject: data.subject,
        day_of_week: data.day_of_week,
        start_time: data.start_time,
        end_time: data.end_time,
        room: data.room,
    };
    let slot = match normalize_input(&mut input) {
        Ok(slot) => slot,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request)?;
    if let Some(resp) = check_references(&storage, &input).await? {
        return Ok(resp);
    }
    if let Some(conflict) = check_conflict(&storage, &input, slot, None).await? {
        return Ok(conflict_response(conflict));
    }

    let entry = storage.create_timetable(input).await?;
    info!(
        "Timetable entry {} created for section {} on {}",
        entry.id, entry.section_id, entry.day_of_week
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(
        entry,
        "Timetable entry created successfully",
    )))
}
