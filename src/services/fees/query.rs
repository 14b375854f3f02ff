use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::models::fees::requests::{FeeListQuery, FeeQueryParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, not_found};

pub async fn list_fees(
    service: &FeeService,
    request: &HttpRequest,
    query: FeeQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = FeeListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        student_id: query.student_id,
        status: query.status,
        semester: query.semester,
    };

    let response = storage.list_fees_with_pagination(list_query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Fee list retrieved successfully",
    )))
}

pub async fn get_fee(
    service: &FeeService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_fee_by_id(id).await? {
        Some(fee) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            fee,
            "Fee retrieved successfully",
        ))),
        None => Ok(not_found(ErrorCode::FeeNotFound, "Fee not found")),
    }
}

pub async fn my_fees(service: &FeeService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let Some(student) = storage.get_student_by_user_id(user.id).await? else {
        return Ok(not_found(
            ErrorCode::StudentNotFound,
            "No student profile is linked to this account",
        ));
    };
    let fees = storage.list_fees_by_student(student.student.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        fees,
        "Fees retrieved successfully",
    )))
}
