//! 分班存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::sections::{ActiveModel, Column, Entity as Sections};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{CollegeHubError, Result};
use crate::models::sections::{
    entities::{Section, SectionDetail},
    requests::{CreateSectionRequest, UpdateSectionRequest},
};
use crate::utils::sql::map_write_error;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    pub async fn create_section_impl(
        &self,
        class_id: i64,
        req: CreateSectionRequest,
    ) -> Result<Section> {
        let now = Self::now();

        let model = ActiveModel {
            class_id: Set(class_id),
            name: Set(req.name.trim().to_string()),
            capacity: Set(req.capacity),
            class_teacher_id: Set(req.class_teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建分班失败"))?;

        Ok(result.into_section())
    }

    pub async fn get_section_by_id_impl(&self, id: i64) -> Result<Option<Section>> {
        let result = Sections::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询分班失败: {e}")))?;

        Ok(result.map(|m| m.into_section()))
    }

    pub async fn get_section_by_name_impl(
        &self,
        class_id: i64,
        name: &str,
    ) -> Result<Option<Section>> {
        let result = Sections::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Name.eq(name.trim()))
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询分班失败: {e}")))?;

        Ok(result.map(|m| m.into_section()))
    }

    /// 列出班级下的分班及人数
    pub async fn list_sections_by_class_impl(&self, class_id: i64) -> Result<Vec<SectionDetail>> {
        let sections = Sections::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询分班失败: {e}")))?;

        let ids: Vec<i64> = sections.iter().map(|s| s.id).collect();
        let counts: HashMap<i64, i64> = if ids.is_empty() {
            HashMap::new()
        } else {
            Students::find()
                .select_only()
                .column(StudentColumn::SectionId)
                .column_as(StudentColumn::Id.count(), "count")
                .filter(StudentColumn::SectionId.is_in(ids))
                .group_by(StudentColumn::SectionId)
                .into_tuple::<(i64, i64)>()
                .all(&self.db)
                .await
                .map_err(|e| {
                    CollegeHubError::database_operation(format!("统计分班人数失败: {e}"))
                })?
                .into_iter()
                .collect()
        };

        Ok(sections
            .into_iter()
            .map(|m| {
                let student_count = counts.get(&m.id).copied().unwrap_or(0);
                SectionDetail {
                    section: m.into_section(),
                    student_count,
                }
            })
            .collect())
    }

    pub async fn update_section_impl(
        &self,
        id: i64,
        update: UpdateSectionRequest,
    ) -> Result<Option<Section>> {
        if self.get_section_by_id_impl(id).await?.is_none() {
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
        if let Some(capacity) = update.capacity {
            model.capacity = Set(capacity);
        }
        if let Some(class_teacher_id) = update.class_teacher_id {
            model.class_teacher_id = Set(Some(class_teacher_id));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(e, "更新分班失败"))?;

        Ok(Some(updated.into_section()))
    }

    /// 删除分班：课表与考勤级联删除，学生解除分班
    pub async fn delete_section_impl(&self, id: i64) -> Result<bool> {
        let result = Sections::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_error(e, "删除分班失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_students_in_section_impl(&self, section_id: i64) -> Result<u64> {
        Students::find()
            .filter(StudentColumn::SectionId.eq(section_id))
            .count(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("统计分班人数失败: {e}")))
    }
}
