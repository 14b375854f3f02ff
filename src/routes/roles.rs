use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::roles::requests::UpdateRoleRequest;
use crate::models::users::entities::UserRole;
use crate::services::RoleService;
use crate::utils::SafeRoleName;

static ROLE_SERVICE: Lazy<RoleService> = Lazy::new(RoleService::new_lazy);

pub async fn list_roles(req: HttpRequest) -> ActixResult<HttpResponse> {
    ROLE_SERVICE.list_roles(&req).await
}

pub async fn get_role(req: HttpRequest, name: SafeRoleName) -> ActixResult<HttpResponse> {
    ROLE_SERVICE.get_role(name.0, &req).await
}

pub async fn update_role(
    req: HttpRequest,
    name: SafeRoleName,
    body: web::Json<UpdateRoleRequest>,
) -> ActixResult<HttpResponse> {
    ROLE_SERVICE
        .update_role(name.0, body.into_inner(), &req)
        .await
}

pub fn configure_role_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/roles")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::get()
                        .to(list_roles)
                        .wrap(middlewares::RequireRole::new_any(UserRole::office_roles())),
                ),
            )
            .service(
                web::resource("/{name}")
                    .route(
                        web::get()
                            .to(get_role)
                            .wrap(middlewares::RequireRole::new_any(UserRole::office_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_role)
                            // 仅管理员可修改权限
                            .wrap(middlewares::RequireRole::new(UserRole::Admin)),
                    ),
            ),
    );
}
