use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::programs::requests::{
    CreateProgramRequest, ProgramQueryParams, UpdateProgramRequest,
};
use crate::models::roles::entities::Permission;
use crate::services::ProgramService;
use crate::utils::SafeIDI64;

static PROGRAM_SERVICE: Lazy<ProgramService> = Lazy::new(ProgramService::new_lazy);

pub async fn list_programs(
    req: HttpRequest,
    query: web::Query<ProgramQueryParams>,
) -> ActixResult<HttpResponse> {
    PROGRAM_SERVICE.list_programs(&req, query.into_inner()).await
}

pub async fn create_program(
    req: HttpRequest,
    body: web::Json<CreateProgramRequest>,
) -> ActixResult<HttpResponse> {
    PROGRAM_SERVICE.create_program(&req, body.into_inner()).await
}

pub async fn get_program(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PROGRAM_SERVICE.get_program(&req, id.0).await
}

pub async fn update_program(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateProgramRequest>,
) -> ActixResult<HttpResponse> {
    PROGRAM_SERVICE
        .update_program(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_program(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PROGRAM_SERVICE.delete_program(&req, id.0).await
}

pub fn configure_program_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/programs")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_programs))
                    .route(
                        web::post()
                            .to(create_program)
                            .wrap(RequirePermission::new(Permission::AcademicsManage)),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_program))
                    .route(
                        web::put()
                            .to(update_program)
                            .wrap(RequirePermission::new(Permission::AcademicsManage)),
                    )
                    .route(
                        web::delete()
                            .to(delete_program)
                            .wrap(RequirePermission::new(Permission::AcademicsManage)),
                    ),
            ),
    );
}
