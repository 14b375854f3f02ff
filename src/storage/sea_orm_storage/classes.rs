//! 班级存储操作

use super::SeaOrmStorage;
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{CollegeHubError, Result};
use crate::models::{
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    common::normalize_page,
};
use crate::utils::{like_any, sql::map_write_error};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = Self::now();

        let model = ActiveModel {
            program_id: Set(req.program_id),
            name: Set(req.name.trim().to_string()),
            code: Set(req.code.trim().to_uppercase()),
            semester: Set(req.semester),
            academic_year: Set(req.academic_year),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建班级失败"))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 通过班级代码获取班级
    pub async fn get_class_by_code_impl(&self, code: &str) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::Code.eq(code.trim().to_uppercase()))
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Classes::find();

        // 专业筛选
        if let Some(program_id) = query.program_id {
            select = select.filter(Column::ProgramId.eq(program_id));
        }

        // 学年筛选
        if let Some(ref year) = query.academic_year
            && !year.trim().is_empty()
        {
            select = select.filter(Column::AcademicYear.eq(year.trim()));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(like_any(&[Column::Name, Column::Code], search));
        }

        select = select
            .order_by_desc(Column::AcademicYear)
            .order_by_asc(Column::Name);

        let (classes, pagination) = self.fetch_page(select, page, size, "班级").await?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination,
        })
    }

    /// 更新班级信息
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        // 先检查班级是否存在
        if self.get_class_by_id_impl(class_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(Self::now()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(code) = update.code {
            model.code = Set(code.trim().to_uppercase());
        }
        if let Some(semester) = update.semester {
            model.semester = Set(semester);
        }
        if let Some(academic_year) = update.academic_year {
            model.academic_year = Set(academic_year);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(e, "更新班级失败"))?;

        Ok(Some(updated.into_class()))
    }

    /// 删除班级，分班随之级联删除
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_error(e, "删除班级失败"))?;

        Ok(result.rows_affected > 0)
    }
}
