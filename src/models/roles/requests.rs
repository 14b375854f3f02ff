use serde::Deserialize;
use ts_rs::TS;

use super::entities::Permission;

// 更新角色请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/role.ts")]
pub struct UpdateRoleRequest {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<Permission>>,
}
