use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeacherService, validate_profile};
use crate::models::{ApiResponse, ErrorCode, teachers::requests::UpdateTeacherRequest};
use crate::services::{bad_request, conflict, invalidate_user_cache, not_found};
use crate::utils::validate::validate_email;

pub async fn update_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    id: i64,
    mut data: UpdateTeacherRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_profile(data.employee_id.as_deref(), data.joining_date.as_deref()) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;

    let Some(current) = storage.get_teacher_by_id(id).await? else {
        return Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found"));
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

    if let Some(ref mut employee_id) = data.employee_id {
        *employee_id = employee_id.trim().to_string();
        if *employee_id != current.teacher.employee_id
            && !storage
                .check_employee_ids_exist(std::slice::from_ref(employee_id))
                .await?
                .is_empty()
        {
            return Ok(conflict(
                ErrorCode::TeacherAlreadyExists,
                format!("Employee ID '{employee_id}' already exists"),
            ));
        }
    }

    if let Some(department_id) = data.department_id
        && storage.get_department_by_id(department_id).await?.is_none()
    {
        return Ok(bad_request(
            ErrorCode::DepartmentNotFound,
            "Department does not exist",
        ));
    }

    match storage.update_teacher(id, data).await? {
        Some(teacher) => {
            invalidate_user_cache(request, teacher.user.id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                teacher,
                "Teacher updated successfully",
            )))
        }
        None => Ok(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
    }
}
