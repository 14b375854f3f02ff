use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::attendance::requests::MarkAttendanceRequest;
use crate::models::roles::entities::Permission;
use crate::services::AttendanceService;

static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn mark_attendance(
    req: HttpRequest,
    body: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .mark_attendance(&req, body.into_inner())
        .await
}

// 查询接口挂在 /sections 与 /students 下
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(RequirePermission::new(Permission::AttendanceMark))
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(mark_attendance)),
    );
}
