use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, check_enrollment, validate_profile};
use crate::models::{ApiResponse, ErrorCode, students::requests::UpdateStudentRequest};
use crate::services::{bad_request, conflict, invalidate_user_cache, not_found};
use crate::utils::validate::validate_email;

pub async fn update_student(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
    mut data: UpdateStudentRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_profile(
        data.roll_number.as_deref(),
        data.date_of_birth.as_deref(),
        data.admission_date.as_deref(),
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;

    let Some(current) = storage.get_student_by_id(id).await? else {
        return Ok(not_found(ErrorCode::StudentNotFound, "Student not found"));
    };

    if let Some(ref mut email) = data.email {
        *email = email.trim().to_string();
        if let Err(msg) = validate_email(email) {
            return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
        }
        if let Some(existing) = storage.get_user_by_email(email).await?
            && existing.id != current.user.id
        {
            return Ok(conflict(ErrorCode::UserEmailAlreadyExists, "Email already exists"));
        }
    }

    if let Some(ref mut roll_number) = data.roll_number {
        *roll_number = roll_number.trim().to_string();
        if *roll_number != current.student.roll_number
            && !storage
                .check_roll_numbers_exist(std::slice::from_ref(roll_number))
                .await?
                .is_empty()
        {
            return Ok(conflict(
                ErrorCode::StudentAlreadyExists,
                format!("Roll number '{roll_number}' already exists"),
            ));
        }
    }

    // 归属变化时按合并后的值重新校验
    if data.program_id.is_some() || data.class_id.is_some() || data.section_id.is_some() {
        let program_id = data.program_id.unwrap_or(current.student.program_id);
        let class_id = data.class_id.or(current.student.class_id);
        let section_id = data.section_id.or(current.student.section_id);
        if let Some(err) = check_enrollment(
            &storage,
            program_id,
            class_id,
            section_id,
            current.student.section_id,
        )
        .await?
        {
            return Ok(err.into_response());
        }
    }

    match storage.update_student(id, data).await? {
        Some(student) => {
            invalidate_user_cache(request, student.user.id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                student,
                "Student updated successfully",
            )))
        }
        None => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
    }
}
