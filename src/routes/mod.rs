pub mod attendance;

pub mod auth;

pub mod classes;

pub mod dashboard;

pub mod departments;

pub mod fees;

pub mod frontend;

pub mod programs;

pub mod roles;

pub mod sections;

pub mod students;

pub mod teachers;

pub mod timetables;

pub mod users;

pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use dashboard::configure_dashboard_routes;
pub use departments::configure_department_routes;
pub use fees::configure_fee_routes;
pub use frontend::configure_frontend_routes;
pub use programs::configure_program_routes;
pub use roles::configure_role_routes;
pub use sections::configure_section_routes;
pub use students::configure_student_routes;
pub use teachers::configure_teacher_routes;
pub use timetables::configure_timetable_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 API 路由，前端兜底路由最后注册
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_role_routes)
        .configure(configure_department_routes)
        .configure(configure_program_routes)
        .configure(configure_classes_routes)
        .configure(configure_section_routes)
        .configure(configure_timetable_routes)
        .configure(configure_teacher_routes)
        .configure(configure_student_routes)
        .configure(configure_attendance_routes)
        .configure(configure_fee_routes)
        .configure(configure_dashboard_routes);
}
