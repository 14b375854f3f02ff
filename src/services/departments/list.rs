use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DepartmentService;
use crate::models::{
    ApiResponse,
    departments::requests::{DepartmentListQuery, DepartmentQueryParams},
};

pub async fn list_departments(
    service: &DepartmentService,
    request: &HttpRequest,
    query: DepartmentQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = DepartmentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
    };

    let response = storage.list_departments_with_pagination(list_query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Department list retrieved successfully",
    )))
}
