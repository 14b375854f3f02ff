//! 专业存储操作

use super::SeaOrmStorage;
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::programs::{ActiveModel, Column, Entity as Programs};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{CollegeHubError, Result};
use crate::models::{
    PaginatedResponse,
    common::normalize_page,
    programs::{
        entities::Program,
        requests::{CreateProgramRequest, ProgramListQuery, UpdateProgramRequest},
    },
};
use crate::utils::{like_any, sql::map_write_error};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_program_impl(&self, req: CreateProgramRequest) -> Result<Program> {
        let now = Self::now();

        let model = ActiveModel {
            department_id: Set(req.department_id),
            name: Set(req.name.trim().to_string()),
            code: Set(req.code.trim().to_uppercase()),
            duration_semesters: Set(req.duration_semesters),
            fee_per_semester: Set(req.fee_per_semester),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建专业失败"))?;

        Ok(result.into_program())
    }

    pub async fn get_program_by_id_impl(&self, id: i64) -> Result<Option<Program>> {
        let result = Programs::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询专业失败: {e}")))?;

        Ok(result.map(|m| m.into_program()))
    }

    pub async fn get_program_by_code_impl(&self, code: &str) -> Result<Option<Program>> {
        let result = Programs::find()
            .filter(Column::Code.eq(code.trim().to_uppercase()))
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询专业失败: {e}")))?;

        Ok(result.map(|m| m.into_program()))
    }

    pub async fn list_programs_with_pagination_impl(
        &self,
        query: ProgramListQuery,
    ) -> Result<PaginatedResponse<Program>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Programs::find();
        if let Some(department_id) = query.department_id {
            select = select.filter(Column::DepartmentId.eq(department_id));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(like_any(&[Column::Name, Column::Code], search));
        }
        select = select.order_by_asc(Column::Name);

        let (items, pagination) = self.fetch_page(select, page, size, "专业").await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_program()).collect(),
            pagination,
        })
    }

    pub async fn update_program_impl(
        &self,
        id: i64,
        update: UpdateProgramRequest,
    ) -> Result<Option<Program>> {
        if self.get_program_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(Self::now()),
            ..Default::default()
        };

        if let Some(department_id) = update.department_id {
            model.department_id = Set(department_id);
        }
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(code) = update.code {
            model.code = Set(code.trim().to_uppercase());
        }
        if let Some(duration) = update.duration_semesters {
            model.duration_semesters = Set(duration);
        }
        if let Some(fee) = update.fee_per_semester {
            model.fee_per_semester = Set(fee);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description).filter(|d| !d.trim().is_empty()));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(e, "更新专业失败"))?;

        Ok(Some(updated.into_program()))
    }

    pub async fn delete_program_impl(&self, id: i64) -> Result<bool> {
        let result = Programs::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_error(e, "删除专业失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_classes_in_program_impl(&self, program_id: i64) -> Result<u64> {
        Classes::find()
            .filter(ClassColumn::ProgramId.eq(program_id))
            .count(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("统计班级数量失败: {e}")))
    }

    pub async fn count_students_in_program_impl(&self, program_id: i64) -> Result<u64> {
        Students::find()
            .filter(StudentColumn::ProgramId.eq(program_id))
            .count(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("统计学生数量失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::departments::requests::CreateDepartmentRequest;

    #[tokio::test]
    async fn test_program_requires_department_and_blocks_delete() {
        let storage = SeaOrmStorage::in_memory().await;

        let orphan = storage
            .create_program_impl(CreateProgramRequest {
                department_id: 999,
                name: "Ghost".to_string(),
                code: "GHOST".to_string(),
                duration_semesters: 8,
                fee_per_semester: 0,
                description: None,
            })
            .await;
        assert!(matches!(orphan, Err(CollegeHubError::Conflict(_))));

        let dept = storage
            .create_department_impl(CreateDepartmentRequest {
                name: "Engineering".to_string(),
                code: "ENG".to_string(),
                description: None,
                head_teacher_id: None,
            })
            .await
            .unwrap();

        let program = storage
            .create_program_impl(CreateProgramRequest {
                department_id: dept.id,
                name: "Civil".to_string(),
                code: "civ".to_string(),
                duration_semesters: 8,
                fee_per_semester: 125_000,
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(program.code, "CIV");
        assert_eq!(
            storage.count_programs_in_department_impl(dept.id).await.unwrap(),
            1
        );

        // 院系下仍有专业时数据库拒绝删除
        let err = storage.delete_department_impl(dept.id).await.unwrap_err();
        assert!(matches!(err, CollegeHubError::Conflict(_)));

        let by_code = storage.get_program_by_code_impl("CIV").await.unwrap();
        assert_eq!(by_code.map(|p| p.id), Some(program.id));
    }
}
