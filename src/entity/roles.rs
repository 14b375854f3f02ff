//! 角色实体，权限以 JSON 数组存储

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub permissions: String,
    pub is_system: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_role(self) -> crate::models::roles::entities::Role {
        use super::ts_to_datetime;
        use crate::models::roles::entities::{Permission, Role};
        use crate::models::users::entities::UserRole;

        // 无法识别的权限串直接丢弃
        let permissions = serde_json::from_str::<Vec<String>>(&self.permissions)
            .unwrap_or_default()
            .iter()
            .filter_map(|p| p.parse::<Permission>().ok())
            .collect();

        Role {
            id: self.id,
            name: self.name.parse::<UserRole>().unwrap_or(UserRole::Student),
            display_name: self.display_name,
            description: self.description,
            permissions,
            is_system: self.is_system,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
