pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::roles::requests::UpdateRoleRequest;
use crate::models::users::entities::UserRole;

super::lazy_storage_service!(RoleService);

impl RoleService {
    // 列出内置角色及其权限
    pub async fn list_roles(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_roles(self, request).await
    }

    pub async fn get_role(&self, name: UserRole, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_role(self, name, request).await
    }

    // 更新角色，权限缓存随之失效
    pub async fn update_role(
        &self,
        name: UserRole,
        update: UpdateRoleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_role(self, name, update, request).await
    }
}
