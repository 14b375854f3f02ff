pub mod attendance;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod departments;
pub mod fees;
pub(crate) mod imports;
pub mod programs;
pub mod roles;
pub mod sections;
pub mod students;
pub mod teachers;
pub mod timetables;
pub mod users;

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use dashboard::DashboardService;
pub use departments::DepartmentService;
pub use fees::FeeService;
pub use programs::ProgramService;
pub use roles::RoleService;
pub use sections::SectionService;
pub use students::StudentService;
pub use teachers::TeacherService;
pub use timetables::TimetableService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::{CollegeHubError, Result};
use crate::middlewares::{RequireJWT, require_permission::role_has_permission, user_cache_key};
use crate::models::{ApiResponse, ErrorCode, roles::entities::Permission, users::entities::User};
use crate::storage::Storage;

/// 为服务生成 `new_lazy` / `get_storage`，存储从 app data 中按需取出
macro_rules! lazy_storage_service {
    ($name:ident) => {
        pub struct $name {
            storage: Option<std::sync::Arc<dyn $crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> $crate::errors::Result<std::sync::Arc<dyn $crate::storage::Storage>> {
                match &self.storage {
                    Some(storage) => Ok(storage.clone()),
                    None => $crate::services::storage_from(request),
                }
            }
        }
    };
}
pub(crate) use lazy_storage_service;

pub(crate) fn storage_from(request: &HttpRequest) -> Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| CollegeHubError::database_config("Storage not found in app data"))
}

pub(crate) fn cache_from(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
}

/// 当前登录用户，RequireJWT 之后必然存在
pub(crate) fn current_user(request: &HttpRequest) -> Result<User> {
    RequireJWT::extract_user_claims(request)
        .ok_or_else(|| CollegeHubError::authentication("Unauthorized: missing user"))
}

/// 账号信息变更后移除缓存中的用户
pub(crate) async fn invalidate_user_cache(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = cache_from(request) {
        cache.remove(&user_cache_key(user_id)).await;
    }
}

/// 当前用户是否拥有某权限
pub(crate) async fn user_has_permission(
    request: &HttpRequest,
    storage: &Arc<dyn Storage>,
    user: &User,
    permission: Permission,
) -> Result<bool> {
    let cache = cache_from(request);
    role_has_permission(storage, cache.as_ref(), user.role, permission).await
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn forbidden(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(code, message))
}

/// 服务器本地日期
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
