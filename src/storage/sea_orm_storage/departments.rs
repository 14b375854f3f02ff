//! 院系存储操作

use super::SeaOrmStorage;
use crate::entity::departments::{ActiveModel, Column, Entity as Departments};
use crate::entity::programs::{Column as ProgramColumn, Entity as Programs};
use crate::errors::{CollegeHubError, Result};
use crate::models::{
    PaginatedResponse,
    common::normalize_page,
    departments::{
        entities::Department,
        requests::{CreateDepartmentRequest, DepartmentListQuery, UpdateDepartmentRequest},
    },
};
use crate::utils::{like_any, sql::map_write_error};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_department_impl(&self, req: CreateDepartmentRequest) -> Result<Department> {
        let now = Self::now();

        let model = ActiveModel {
            name: Set(req.name.trim().to_string()),
            code: Set(req.code.trim().to_uppercase()),
            description: Set(req.description),
            head_teacher_id: Set(req.head_teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建院系失败"))?;

        Ok(result.into_department())
    }

    pub async fn get_department_by_id_impl(&self, id: i64) -> Result<Option<Department>> {
        let result = Departments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询院系失败: {e}")))?;

        Ok(result.map(|m| m.into_department()))
    }

    pub async fn get_department_by_code_impl(&self, code: &str) -> Result<Option<Department>> {
        let result = Departments::find()
            .filter(Column::Code.eq(code.trim().to_uppercase()))
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询院系失败: {e}")))?;

        Ok(result.map(|m| m.into_department()))
    }

    pub async fn list_departments_with_pagination_impl(
        &self,
        query: DepartmentListQuery,
    ) -> Result<PaginatedResponse<Department>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Departments::find();
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(like_any(&[Column::Name, Column::Code], search));
        }
        select = select.order_by_asc(Column::Name);

        let (items, pagination) = self.fetch_page(select, page, size, "院系").await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_department()).collect(),
            pagination,
        })
    }

    pub async fn update_department_impl(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        if self.get_department_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(Self::now()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(code) = update.code {
            model.code = Set(code.trim().to_uppercase());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description).filter(|d| !d.trim().is_empty()));
        }
        if let Some(head_teacher_id) = update.head_teacher_id {
            model.head_teacher_id = Set(Some(head_teacher_id));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(e, "更新院系失败"))?;

        Ok(Some(updated.into_department()))
    }

    pub async fn delete_department_impl(&self, id: i64) -> Result<bool> {
        let result = Departments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_error(e, "删除院系失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_programs_in_department_impl(&self, department_id: i64) -> Result<u64> {
        Programs::find()
            .filter(ProgramColumn::DepartmentId.eq(department_id))
            .count(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("统计专业数量失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dept(name: &str, code: &str) -> CreateDepartmentRequest {
        CreateDepartmentRequest {
            name: name.to_string(),
            code: code.to_string(),
            description: None,
            head_teacher_id: None,
        }
    }

    #[tokio::test]
    async fn test_department_crud() {
        let storage = SeaOrmStorage::in_memory().await;
        let cs = storage
            .create_department_impl(dept("Computer Science", "cs"))
            .await
            .unwrap();
        assert_eq!(cs.code, "CS");

        storage
            .create_department_impl(dept("Physics", "PHY"))
            .await
            .unwrap();

        let err = storage
            .create_department_impl(dept("Other", "CS"))
            .await
            .unwrap_err();
        assert!(matches!(err, CollegeHubError::Conflict(_)));

        let found = storage
            .list_departments_with_pagination_impl(DepartmentListQuery {
                search: Some("phy".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.items.len(), 1);

        let updated = storage
            .update_department_impl(
                cs.id,
                UpdateDepartmentRequest {
                    name: Some("Computing".to_string()),
                    code: None,
                    description: None,
                    head_teacher_id: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Computing");

        assert!(storage.delete_department_impl(cs.id).await.unwrap());
        assert!(storage.get_department_by_id_impl(cs.id).await.unwrap().is_none());
    }
}
