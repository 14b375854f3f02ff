use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequirePermission};
use crate::models::imports::requests::ExportParams;
use crate::models::roles::entities::Permission;
use crate::models::teachers::requests::{
    CreateTeacherRequest, TeacherExportParams, TeacherQueryParams, UpdateTeacherRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{TeacherService, TimetableService};
use crate::utils::SafeIDI64;

static TEACHER_SERVICE: Lazy<TeacherService> = Lazy::new(TeacherService::new_lazy);
static TIMETABLE_SERVICE: Lazy<TimetableService> = Lazy::new(TimetableService::new_lazy);

pub async fn list_teachers(
    req: HttpRequest,
    query: web::Query<TeacherQueryParams>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_teachers(&req, query.into_inner()).await
}

pub async fn create_teacher(
    req: HttpRequest,
    body: web::Json<CreateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.create_teacher(&req, body.into_inner()).await
}

pub async fn get_teacher(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.get_teacher(&req, id.0).await
}

pub async fn update_teacher(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .update_teacher(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_teacher(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.delete_teacher(&req, id.0).await
}

pub async fn teacher_timetable(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.teacher_timetable(&req, id.0).await
}

pub async fn import_teachers(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.import_teachers(&req, payload).await
}

pub async fn export_teachers(
    req: HttpRequest,
    query: web::Query<TeacherExportParams>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .export_teachers(&req, query.into_inner())
        .await
}

pub async fn download_template(query: web::Query<ExportParams>) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.download_template(query.into_inner()).await
}

pub fn configure_teacher_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/teachers")
            .wrap(middlewares::RequireJWT)
            // 固定路径需先于 /{id} 注册
            .service(
                web::resource("/import/template").route(
                    web::get()
                        .to(download_template)
                        .wrap(RequirePermission::new(Permission::TeachersManage)),
                ),
            )
            .service(
                web::resource("/import").route(
                    web::post()
                        .to(import_teachers)
                        .wrap(RateLimit::import())
                        .wrap(RequirePermission::new(Permission::TeachersManage)),
                ),
            )
            .service(
                web::resource("/export").route(
                    web::get()
                        .to(export_teachers)
                        .wrap(RequirePermission::new(Permission::TeachersManage)),
                ),
            )
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_teachers)
                            .wrap(middlewares::RequireRole::new_any(UserRole::faculty_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_teacher)
                            .wrap(RequirePermission::new(Permission::TeachersManage)),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_teacher)
                            .wrap(middlewares::RequireRole::new_any(UserRole::faculty_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_teacher)
                            .wrap(RequirePermission::new(Permission::TeachersManage)),
                    )
                    .route(
                        web::delete()
                            .to(delete_teacher)
                            .wrap(RequirePermission::new(Permission::TeachersManage)),
                    ),
            )
            .route("/{id}/timetable", web::get().to(teacher_timetable)),
    );
}
