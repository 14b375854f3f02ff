use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequirePermission};
use crate::models::attendance::requests::AttendanceRangeQuery;
use crate::models::imports::requests::ExportParams;
use crate::models::roles::entities::Permission;
use crate::models::students::requests::{
    CreateStudentRequest, StudentExportParams, StudentQueryParams, UpdateStudentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{AttendanceService, FeeService, StudentService};
use crate::utils::SafeIDI64;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);
static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentQueryParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(&req, query.into_inner()).await
}

pub async fn create_student(
    req: HttpRequest,
    body: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.create_student(&req, body.into_inner()).await
}

pub async fn get_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(&req, id.0).await
}

pub async fn update_student(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(&req, id.0).await
}

pub async fn student_attendance(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<AttendanceRangeQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .student_attendance(&req, id.0, query.into_inner())
        .await
}

// 学生本人
pub async fn get_me(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_my_student(&req).await
}

pub async fn my_attendance(
    req: HttpRequest,
    query: web::Query<AttendanceRangeQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .my_attendance(&req, query.into_inner())
        .await
}

pub async fn my_fees(req: HttpRequest) -> ActixResult<HttpResponse> {
    FEE_SERVICE.my_fees(&req).await
}

pub async fn import_students(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.import_students(&req, payload).await
}

pub async fn export_students(
    req: HttpRequest,
    query: web::Query<StudentExportParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .export_students(&req, query.into_inner())
        .await
}

pub async fn download_template(query: web::Query<ExportParams>) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.download_template(query.into_inner()).await
}

pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("/me")
                    .wrap(middlewares::RequireRole::new(UserRole::Student))
                    .route("", web::get().to(get_me))
                    .route("/attendance", web::get().to(my_attendance))
                    .route("/fees", web::get().to(my_fees)),
            )
            .service(
                web::resource("/import/template").route(
                    web::get()
                        .to(download_template)
                        .wrap(RequirePermission::new(Permission::StudentsManage)),
                ),
            )
            .service(
                web::resource("/import").route(
                    web::post()
                        .to(import_students)
                        .wrap(RateLimit::import())
                        .wrap(RequirePermission::new(Permission::StudentsManage)),
                ),
            )
            .service(
                web::resource("/export").route(
                    web::get()
                        .to(export_students)
                        .wrap(RequirePermission::new(Permission::StudentsManage)),
                ),
            )
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_students)
                            .wrap(middlewares::RequireRole::new_any(UserRole::faculty_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_student)
                            .wrap(RequirePermission::new(Permission::StudentsManage)),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_student)
                            .wrap(middlewares::RequireRole::new_any(UserRole::faculty_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_student)
                            .wrap(RequirePermission::new(Permission::StudentsManage)),
                    )
                    .route(
                        web::delete()
                            .to(delete_student)
                            .wrap(RequirePermission::new(Permission::StudentsManage)),
                    ),
            )
            .service(
                web::resource("/{id}/attendance").route(
                    web::get()
                        .to(student_attendance)
                        .wrap(RequirePermission::new(Permission::AttendanceView)),
                ),
            ),
    );
}
