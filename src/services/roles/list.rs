use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RoleService;
use crate::models::ApiResponse;

pub async fn list_roles(service: &RoleService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let roles = storage.list_roles().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(roles, "Role list retrieved successfully")))
}
