pub mod create;
pub mod delete;
pub mod schedule;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveTime;
use std::sync::Arc;

use crate::errors::Result;
use crate::models::timetables::entities::{
    SlotCandidate, TimetableConflict, find_conflict, parse_clock_time,
};
use crate::models::timetables::requests::{
    CreateTimetableRequest, TimetableInput, UpdateTimetableRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::bad_request;
use crate::storage::Storage;
use crate::utils::validate::validate_required;

super::lazy_storage_service!(TimetableService);

impl TimetableService {
    pub async fn create_timetable(
        &self,
        request: &HttpRequest,
        data: CreateTimetableRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_timetable(self, request, data).await
    }

    pub async fn update_timetable(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateTimetableRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_timetable(self, request, id, data).await
    }

    pub async fn delete_timetable(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_timetable(self, request, id).await
    }

    // 分班周课表
    pub async fn section_timetable(
        &self,
        request: &HttpRequest,
        section_id: i64,
    ) -> ActixResult<HttpResponse> {
        schedule::section_timetable(self, request, section_id).await
    }

    pub async fn teacher_timetable(
        &self,
        request: &HttpRequest,
        teacher_id: i64,
    ) -> ActixResult<HttpResponse> {
        schedule::teacher_timetable(self, request, teacher_id).await
    }

    // 教师看自己的课，学生看所在分班的课
    pub async fn my_timetable(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        schedule::my_timetable(self, request).await
    }
}

/// 校验时间段，要求 start < end
pub(crate) fn validate_slot(
    start: &str,
    end: &str,
) -> std::result::Result<(NaiveTime, NaiveTime), String> {
    let start = parse_clock_time(start)?;
    let end = parse_clock_time(end)?;
    if start >= end {
        return Err("开始时间必须早于结束时间".to_string());
    }
    Ok((start, end))
}

/// 规范化并校验待写入的条目，返回解析后的时间段
fn normalize_input(
    input: &mut TimetableInput,
) -> std::result::Result<(NaiveTime, NaiveTime), HttpResponse> {
    input.subject = input.subject.trim().to_string();
    input.start_time = input.start_time.trim().to_string();
    input.end_time = input.end_time.trim().to_string();
    input.room = input
        .room
        .take()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    if let Err(msg) = validate_required("subject", &input.subject, 100) {
        return Err(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Some(ref room) = input.room
        && let Err(msg) = validate_required("room", room, 32)
    {
        return Err(bad_request(ErrorCode::ValidationFailed, msg));
    }
    let slot = validate_slot(&input.start_time, &input.end_time)
        .map_err(|msg| bad_request(ErrorCode::TimetableInvalidTime, msg))?;

    // 统一存为两位小时，保证按文本排序与按时间排序一致
    input.start_time = slot.0.format("%H:%M").to_string();
    input.end_time = slot.1.format("%H:%M").to_string();
    Ok(slot)
}

/// 分班与教师需存在
async fn check_references(
    storage: &Arc<dyn Storage>,
    input: &TimetableInput,
) -> Result<Option<HttpResponse>> {
    if storage.get_section_by_id(input.section_id).await?.is_none() {
        return Ok(Some(bad_request(
            ErrorCode::SectionNotFound,
            "Section does not exist",
        )));
    }
    if storage.get_teacher_by_id(input.teacher_id).await?.is_none() {
        return Ok(Some(bad_request(
            ErrorCode::TeacherNotFound,
            "Teacher does not exist",
        )));
    }
    Ok(None)
}

/// 同一天内的分班、教师、教室冲突
async fn check_conflict(
    storage: &Arc<dyn Storage>,
    input: &TimetableInput,
    slot: (NaiveTime, NaiveTime),
    exclude_id: Option<i64>,
) -> Result<Option<TimetableConflict>> {
    let same_day = storage
        .list_timetable_candidates(
            input.day_of_week,
            input.section_id,
            input.teacher_id,
            input.room.as_deref(),
        )
        .await?;

    let candidate = SlotCandidate {
        exclude_id,
        section_id: input.section_id,
        teacher_id: input.teacher_id,
        room: input.room.as_deref(),
        start: slot.0,
        end: slot.1,
    };
    Ok(find_conflict(&candidate, &same_day))
}

fn conflict_response(conflict: TimetableConflict) -> HttpResponse {
    let message = format!(
        "Time slot conflicts with {} on {} {}-{} ({})",
        conflict.entry.subject,
        conflict.entry.day_of_week,
        conflict.entry.start_time,
        conflict.entry.end_time,
        conflict.kind,
    );
    HttpResponse::Conflict().json(ApiResponse::error(
        ErrorCode::TimetableConflict,
        conflict,
        message,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timetables::entities::DayOfWeek;

    fn input(start: &str, end: &str, room: Option<&str>) -> TimetableInput {
        TimetableInput {
            section_id: 1,
            teacher_id: 1,
            subject: "  Data Structures ".to_string(),
            day_of_week: DayOfWeek::Tuesday,
            start_time: start.to_string(),
            end_time: end.to_string(),
            room: room.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_slot() {
        assert!(validate_slot("09:00", "10:00").is_ok());
        assert!(validate_slot("10:00", "10:00").is_err());
        assert!(validate_slot("11:00", "10:00").is_err());
        assert!(validate_slot("9", "10:00").is_err());
    }

    #[test]
    fn test_normalize_input_trims_and_drops_blank_room() {
        let mut data = input(" 09:00", "10:00 ", Some("   "));
        assert!(normalize_input(&mut data).is_ok());
        assert_eq!(data.subject, "Data Structures");
        assert_eq!(data.start_time, "09:00");
        assert_eq!(data.room, None);

        let mut data = input("10:00", "09:00", None);
        let resp = normalize_input(&mut data).unwrap_err();
        assert_eq!(resp.status(), 400);
    }

    #[test]
    fn test_normalize_input_pads_single_digit_hours() {
        let mut data = input("9:00", "9:45", Some("B-12"));
        normalize_input(&mut data).unwrap();
        assert_eq!(data.start_time, "09:00");
        assert_eq!(data.end_time, "09:45");
        assert_eq!(data.room.as_deref(), Some("B-12"));
    }

    #[test]
    fn test_merge_room_blank_clears_existing() {
        assert_eq!(update::merge_room(Some(" ".to_string()), Some("A-1".to_string())), None);
        assert_eq!(update::merge_room(None, Some("A-1".to_string())).as_deref(), Some("A-1"));
        assert_eq!(
            update::merge_room(Some("C-3".to_string()), Some("A-1".to_string())).as_deref(),
            Some("C-3")
        );
    }
}
