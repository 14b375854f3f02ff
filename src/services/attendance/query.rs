//! 点名表、个人考勤与分班报表

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;

use super::{AttendanceService, resolve_range};
use crate::models::attendance::entities::{AttendanceRecord, AttendanceSummary};
use crate::models::attendance::requests::{AttendanceDateQuery, AttendanceRangeQuery};
use crate::models::attendance::responses::{
    AttendanceReportRow, AttendanceSheetResponse, AttendanceSheetRow, SectionAttendanceReport,
    StudentAttendanceResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, not_found, today};
use crate::storage::Storage;
use crate::utils::validate::parse_date;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub async fn section_sheet(
    service: &AttendanceService,
    request: &HttpRequest,
    section_id: i64,
    query: AttendanceDateQuery,
) -> ActixResult<HttpResponse> {
    let date = match query.date.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(date) => match parse_date(date) {
            Ok(date) => date,
            Err(msg) => return Ok(bad_request(ErrorCode::AttendanceInvalidDate, msg)),
        },
        None => today(),
    };
    let date = date.format(DATE_FORMAT).to_string();

    let storage = service.get_storage(request)?;
    if storage.get_section_by_id(section_id).await?.is_none() {
        return Ok(not_found(ErrorCode::SectionNotFound, "Section not found"));
    }

    let students = storage.list_students_in_section(section_id).await?;
    let mut marked: HashMap<i64, AttendanceRecord> = storage
        .list_attendance_by_section_date(section_id, &date)
        .await?
        .into_iter()
        .map(|r| (r.student_id, r))
        .collect();

    // 未点名的学生状态为空
    let items = students
        .iter()
        .map(|s| {
            let record = marked.remove(&s.student.id);
            AttendanceSheetRow {
                student_id: s.student.id,
                roll_number: s.student.roll_number.clone(),
                name: s.name().to_string(),
                status: record.as_ref().map(|r| r.status),
                remarks: record.and_then(|r| r.remarks),
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttendanceSheetResponse {
            section_id,
            date,
            items,
        },
        "Attendance sheet retrieved successfully",
    )))
}

pub async fn section_report(
    service: &AttendanceService,
    request: &HttpRequest,
    section_id: i64,
    query: AttendanceRangeQuery,
) -> ActixResult<HttpResponse> {
    let (from, to) = match resolve_range(&query, today()) {
        Ok(range) => range,
        Err(msg) => return Ok(bad_request(ErrorCode::AttendanceInvalidDate, msg)),
    };
    let from = from.format(DATE_FORMAT).to_string();
    let to = to.format(DATE_FORMAT).to_string();

    let storage = service.get_storage(request)?;
    if storage.get_section_by_id(section_id).await?.is_none() {
        return Ok(not_found(ErrorCode::SectionNotFound, "Section not found"));
    }

    let students = storage.list_students_in_section(section_id).await?;
    let mut by_student: HashMap<i64, Vec<_>> = HashMap::new();
    for record in storage
        .list_attendance_by_section_range(section_id, &from, &to)
        .await?
    {
        by_student
            .entry(record.student_id)
            .or_default()
            .push(record.status);
    }

    let items = students
        .iter()
        .map(|s| AttendanceReportRow {
            student_id: s.student.id,
            roll_number: s.student.roll_number.clone(),
            name: s.name().to_string(),
            summary: AttendanceSummary::from_statuses(
                by_student.remove(&s.student.id).unwrap_or_default(),
            ),
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SectionAttendanceReport {
            section_id,
            from,
            to,
            items,
        },
        "Attendance report retrieved successfully",
    )))
}

pub async fn student_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    student_id: i64,
    query: AttendanceRangeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if storage.get_student_by_id(student_id).await?.is_none() {
        return Ok(not_found(ErrorCode::StudentNotFound, "Student not found"));
    }
    student_history(&storage, student_id, &query).await
}

pub async fn my_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    query: AttendanceRangeQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    match storage.get_student_by_user_id(user.id).await? {
        Some(student) => student_history(&storage, student.student.id, &query).await,
        None => Ok(not_found(
            ErrorCode::StudentNotFound,
            "No student profile is linked to this account",
        )),
    }
}

async fn student_history(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    query: &AttendanceRangeQuery,
) -> ActixResult<HttpResponse> {
    let (from, to) = match resolve_range(query, today()) {
        Ok(range) => range,
        Err(msg) => return Ok(bad_request(ErrorCode::AttendanceInvalidDate, msg)),
    };
    let from = from.format(DATE_FORMAT).to_string();
    let to = to.format(DATE_FORMAT).to_string();

    let records = storage
        .list_attendance_by_student(student_id, &from, &to)
        .await?;
    let summary = AttendanceSummary::from_statuses(records.iter().map(|r| r.status));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentAttendanceResponse {
            student_id,
            from,
            to,
            records,
            summary,
        },
        "Attendance retrieved successfully",
    )))
}
