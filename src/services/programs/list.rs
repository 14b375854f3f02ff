use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProgramService;
use crate::models::{
    ApiResponse,
    programs::requests::{ProgramListQuery, ProgramQueryParams},
};

pub async fn list_programs(
    service: &ProgramService,
    request: &HttpRequest,
    query: ProgramQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = ProgramListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        department_id: query.department_id,
        search: query.search,
    };

    let response = storage.list_programs_with_pagination(list_query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Program list retrieved successfully",
    )))
}
