use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{
    ApiResponse,
    classes::requests::{ClassListQuery, ClassQueryParams},
};

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = ClassListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        program_id: query.program_id,
        academic_year: query.academic_year,
        search: query.search,
    };

    let response = storage.list_classes_with_pagination(list_query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Class list retrieved successfully",
    )))
}
