//! 按分班、教师查询周课表

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TimetableService;
use crate::models::timetables::entities::group_by_day;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, not_found};

pub async fn section_timetable(
    service: &TimetableService,
    request: &HttpRequest,
    section_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.get_section_by_id(section_id).await?.is_none() {
        return Ok(not_found(ErrorCode::SectionNotFound, "Section not found"));
    }
    let entries = storage.list_timetable_by_section(section_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        group_by_day(entries),
        "Timetable retrieved successfully",
    )))
}

pub async fn teacher_timetable(
    service: &TimetableService,
    request: &HttpRequest,
    teacher_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.get_teacher_by_id(teacher_id).await?.is_none() {
        return Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found"));
    }
    let entries = storage.list_timetable_by_teacher(teacher_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        group_by_day(entries),
        "Timetable retrieved successfully",
    )))
}

pub async fn my_timetable(
    service: &TimetableService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let entries = match user.role {
        UserRole::Teacher => match storage.get_teacher_by_user_id(user.id).await? {
            Some(teacher) => storage.list_timetable_by_teacher(teacher.teacher.id).await?,
            None => {
                return Ok(not_found(
                    ErrorCode::TeacherNotFound,
                    "No teacher profile is linked to this account",
                ));
            }
        },
        UserRole::Student => match storage.get_student_by_user_id(user.id).await? {
            // 未分班的学生没有课表
            Some(student) => match student.student.section_id {
                Some(section_id) => storage.list_timetable_by_section(section_id).await?,
                None => Vec::new(),
            },
            None => {
                return Ok(not_found(
                    ErrorCode::StudentNotFound,
                    "No student profile is linked to this account",
                ));
            }
        },
        _ => {
            return Ok(forbidden(
                ErrorCode::Forbidden,
                "Only teachers and students have a personal timetable",
            ));
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        group_by_day(entries),
        "Timetable retrieved successfully",
    )))
}
