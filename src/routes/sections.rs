use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::attendance::requests::{AttendanceDateQuery, AttendanceRangeQuery};
use crate::models::roles::entities::Permission;
use crate::models::sections::requests::UpdateSectionRequest;
use crate::models::users::entities::UserRole;
use crate::services::{AttendanceService, SectionService, TimetableService};
use crate::utils::SafeIDI64;

static SECTION_SERVICE: Lazy<SectionService> = Lazy::new(SectionService::new_lazy);
static TIMETABLE_SERVICE: Lazy<TimetableService> = Lazy::new(TimetableService::new_lazy);
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn get_section(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SECTION_SERVICE.get_section(&req, id.0).await
}

pub async fn update_section(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateSectionRequest>,
) -> ActixResult<HttpResponse> {
    SECTION_SERVICE
        .update_section(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_section(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SECTION_SERVICE.delete_section(&req, id.0).await
}

pub async fn list_section_students(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SECTION_SERVICE.list_section_students(&req, id.0).await
}

pub async fn section_timetable(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.section_timetable(&req, id.0).await
}

pub async fn section_attendance(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<AttendanceDateQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .section_sheet(&req, id.0, query.into_inner())
        .await
}

pub async fn section_attendance_report(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<AttendanceRangeQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .section_report(&req, id.0, query.into_inner())
        .await
}

pub fn configure_section_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/sections")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_section))
                    .route(
                        web::put()
                            .to(update_section)
                            .wrap(RequirePermission::new(Permission::AcademicsManage)),
                    )
                    .route(
                        web::delete()
                            .to(delete_section)
                            .wrap(RequirePermission::new(Permission::AcademicsManage)),
                    ),
            )
            .service(
                web::resource("/{id}/students").route(
                    web::get()
                        .to(list_section_students)
                        .wrap(middlewares::RequireRole::new_any(UserRole::faculty_roles())),
                ),
            )
            .route("/{id}/timetable", web::get().to(section_timetable))
            .service(
                web::resource("/{id}/attendance").route(
                    web::get()
                        .to(section_attendance)
                        .wrap(RequirePermission::new(Permission::AttendanceView)),
                ),
            )
            .service(
                web::resource("/{id}/attendance/report").route(
                    web::get()
                        .to(section_attendance_report)
                        .wrap(RequirePermission::new(Permission::AttendanceView)),
                ),
            ),
    );
}
