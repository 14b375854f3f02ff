use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::roles::entities::Permission;
use crate::models::timetables::requests::{CreateTimetableRequest, UpdateTimetableRequest};
use crate::models::users::entities::UserRole;
use crate::services::TimetableService;
use crate::utils::SafeIDI64;

static TIMETABLE_SERVICE: Lazy<TimetableService> = Lazy::new(TimetableService::new_lazy);

pub async fn create_timetable(
    req: HttpRequest,
    body: web::Json<CreateTimetableRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .create_timetable(&req, body.into_inner())
        .await
}

pub async fn update_timetable(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateTimetableRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .update_timetable(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_timetable(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.delete_timetable(&req, id.0).await
}

pub async fn my_timetable(req: HttpRequest) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.my_timetable(&req).await
}

pub fn configure_timetable_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/timetables")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/me").route(web::get().to(my_timetable).wrap(
                    middlewares::RequireRole::new_any(&[&UserRole::Teacher, &UserRole::Student]),
                )),
            )
            .service(
                web::scope("")
                    .wrap(RequirePermission::new(Permission::TimetableManage))
                    .route("", web::post().to(create_timetable))
                    .route("/{id}", web::put().to(update_timetable))
                    .route("/{id}", web::delete().to(delete_timetable)),
            ),
    );
}
