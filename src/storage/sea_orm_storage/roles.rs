//! 角色存储操作

use super::SeaOrmStorage;
use crate::entity::roles::{ActiveModel, Column, Entity as Roles};
use crate::errors::{CollegeHubError, Result};
use crate::models::roles::{
    entities::{Permission, Role},
    requests::UpdateRoleRequest,
};
use crate::models::users::entities::UserRole;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

fn default_display_name(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "Administrator",
        UserRole::Staff => "Staff",
        UserRole::Teacher => "Teacher",
        UserRole::Student => "Student",
    }
}

fn encode_permissions(permissions: &[Permission]) -> Result<String> {
    let names: Vec<&str> = permissions.iter().map(Permission::as_str).collect();
    Ok(serde_json::to_string(&names)?)
}

impl SeaOrmStorage {
    pub async fn list_roles_impl(&self) -> Result<Vec<Role>> {
        let roles = Roles::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询角色失败: {e}")))?;

        Ok(roles.into_iter().map(|m| m.into_role()).collect())
    }

    pub async fn get_role_impl(&self, name: UserRole) -> Result<Option<Role>> {
        let role = Roles::find()
            .filter(Column::Name.eq(name.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询角色失败: {e}")))?;

        Ok(role.map(|m| m.into_role()))
    }

    pub async fn update_role_impl(
        &self,
        name: UserRole,
        update: UpdateRoleRequest,
    ) -> Result<Option<Role>> {
        let Some(existing) = Roles::find()
            .filter(Column::Name.eq(name.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询角色失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(Self::now());

        if let Some(display_name) = update.display_name {
            model.display_name = Set(display_name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description).filter(|d| !d.trim().is_empty()));
        }
        if let Some(mut permissions) = update.permissions {
            permissions.sort_by_key(|p| p.as_str());
            permissions.dedup();
            model.permissions = Set(encode_permissions(&permissions)?);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("更新角色失败: {e}")))?;

        Ok(Some(updated.into_role()))
    }

    /// 补齐缺失的内置角色，已存在的角色保持不变
    pub async fn ensure_default_roles_impl(&self) -> Result<usize> {
        let existing: Vec<String> = Roles::find()
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询角色失败: {e}")))?
            .into_iter()
            .map(|m| m.name)
            .collect();

        let now = Self::now();
        let mut created = 0;
        for role in UserRole::ALL {
            if existing.iter().any(|name| name == role.as_str()) {
                continue;
            }
            let model = ActiveModel {
                name: Set(role.to_string()),
                display_name: Set(default_display_name(*role).to_string()),
                description: Set(None),
                permissions: Set(encode_permissions(&Permission::defaults_for(*role))?),
                is_system: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            model
                .insert(&self.db)
                .await
                .map_err(|e| CollegeHubError::database_operation(format!("创建角色失败: {e}")))?;
            created += 1;
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_permissions_and_update() {
        let storage = SeaOrmStorage::in_memory().await;
        storage.ensure_default_roles_impl().await.unwrap();

        let staff = storage.get_role_impl(UserRole::Staff).await.unwrap().unwrap();
        assert!(staff.allows(Permission::FeesCollect));
        assert!(!staff.allows(Permission::AcademicsManage));

        let updated = storage
            .update_role_impl(
                UserRole::Staff,
                UpdateRoleRequest {
                    display_name: Some("Registrar".to_string()),
                    description: None,
                    permissions: Some(vec![
                        Permission::AcademicsManage,
                        Permission::AcademicsManage,
                    ]),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.display_name, "Registrar");
        assert_eq!(updated.permissions, vec![Permission::AcademicsManage]);
        assert!(!updated.allows(Permission::FeesCollect));

        assert_eq!(storage.list_roles_impl().await.unwrap().len(), 4);
    }
}
