//! 课表存储操作

use super::SeaOrmStorage;
use crate::entity::sections::{Column as SectionColumn, Entity as Sections};
use crate::entity::timetables::{ActiveModel, Column, Entity as Timetables, Model};
use crate::errors::{CollegeHubError, Result};
use crate::models::timetables::{
    entities::{DayOfWeek, TimetableEntry},
    requests::TimetableInput,
};
use crate::utils::sql::map_write_error;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

/// 按星期、开始时间排序
fn sorted_entries(models: Vec<Model>) -> Vec<TimetableEntry> {
    let mut entries: Vec<TimetableEntry> = models.into_iter().map(|m| m.into_entry()).collect();
    entries.sort_by(|a, b| {
        a.day_of_week
            .cmp(&b.day_of_week)
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
    entries
}

fn normalized_room(room: Option<String>) -> Option<String> {
    room.map(|r| r.trim().to_string()).filter(|r| !r.is_empty())
}

impl SeaOrmStorage {
    pub async fn create_timetable_impl(&self, input: TimetableInput) -> Result<TimetableEntry> {
        let now = Self::now();

        let model = ActiveModel {
            section_id: Set(input.section_id),
            teacher_id: Set(input.teacher_id),
            subject: Set(input.subject.trim().to_string()),
            day_of_week: Set(input.day_of_week.to_string()),
            start_time: Set(input.start_time),
            end_time: Set(input.end_time),
            room: Set(normalized_room(input.room)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建课表失败"))?;

        Ok(result.into_entry())
    }

    pub async fn get_timetable_by_id_impl(&self, id: i64) -> Result<Option<TimetableEntry>> {
        let result = Timetables::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(result.map(|m| m.into_entry()))
    }

    /// 整条覆盖写入
    pub async fn update_timetable_impl(
        &self,
        id: i64,
        input: TimetableInput,
    ) -> Result<Option<TimetableEntry>> {
        if self.get_timetable_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            section_id: Set(input.section_id),
            teacher_id: Set(input.teacher_id),
            subject: Set(input.subject.trim().to_string()),
            day_of_week: Set(input.day_of_week.to_string()),
            start_time: Set(input.start_time),
            end_time: Set(input.end_time),
            room: Set(normalized_room(input.room)),
            updated_at: Set(Self::now()),
            ..Default::default()
        };

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(e, "更新课表失败"))?;

        Ok(Some(updated.into_entry()))
    }

    pub async fn delete_timetable_impl(&self, id: i64) -> Result<bool> {
        let result = Timetables::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_error(e, "删除课表失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_timetable_candidates_impl(
        &self,
        day: DayOfWeek,
        section_id: i64,
        teacher_id: i64,
        room: Option<&str>,
    ) -> Result<Vec<TimetableEntry>> {
        let mut related = Condition::any()
            .add(Column::SectionId.eq(section_id))
            .add(Column::TeacherId.eq(teacher_id));
        if let Some(room) = room.map(str::trim).filter(|r| !r.is_empty()) {
            related = related.add(Column::Room.eq(room));
        }

        let models = Timetables::find()
            .filter(Column::DayOfWeek.eq(day.as_str()))
            .filter(related)
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(sorted_entries(models))
    }

    pub async fn list_timetable_by_section_impl(
        &self,
        section_id: i64,
    ) -> Result<Vec<TimetableEntry>> {
        let models = Timetables::find()
            .filter(Column::SectionId.eq(section_id))
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(sorted_entries(models))
    }

    pub async fn list_timetable_by_teacher_impl(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<TimetableEntry>> {
        let models = Timetables::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(sorted_entries(models))
    }

    pub async fn teacher_teaches_section_impl(
        &self,
        teacher_id: i64,
        section_id: i64,
    ) -> Result<bool> {
        let is_class_teacher = Sections::find()
            .filter(SectionColumn::Id.eq(section_id))
            .filter(SectionColumn::ClassTeacherId.eq(teacher_id))
            .count(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询分班失败: {e}")))?
            > 0;
        if is_class_teacher {
            return Ok(true);
        }

        let scheduled = Timetables::find()
            .filter(Column::SectionId.eq(section_id))
            .filter(Column::TeacherId.eq(teacher_id))
            .count(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(scheduled > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timetables::entities::{
        ConflictKind, SlotCandidate, find_conflict, parse_clock_time,
    };
    use crate::storage::sea_orm_storage::students::tests::seed_academics;
    use crate::storage::sea_orm_storage::teachers::tests::new_teacher;

    fn entry(
        section_id: i64,
        teacher_id: i64,
        day: DayOfWeek,
        start: &str,
        end: &str,
    ) -> TimetableInput {
        TimetableInput {
            section_id,
            teacher_id,
            subject: "Algorithms".to_string(),
            day_of_week: day,
            start_time: start.to_string(),
            end_time: end.to_string(),
            room: Some("R-101".to_string()),
        }
    }

    #[tokio::test]
    async fn test_candidates_and_teaching_check() {
        let storage = SeaOrmStorage::in_memory().await;
        let (_, _, section_id) = seed_academics(&storage).await;
        let teacher = storage
            .create_teacher_impl(new_teacher("smith", "EMP001"))
            .await
            .unwrap();
        let other = storage
            .create_teacher_impl(new_teacher("jones", "EMP002"))
            .await
            .unwrap();
        let tid = teacher.teacher.id;

        assert!(!storage.teacher_teaches_section_impl(tid, section_id).await.unwrap());

        storage
            .create_timetable_impl(entry(section_id, tid, DayOfWeek::Wednesday, "10:00", "11:00"))
            .await
            .unwrap();
        storage
            .create_timetable_impl(entry(section_id, tid, DayOfWeek::Monday, "09:00", "10:00"))
            .await
            .unwrap();

        let schedule = storage.list_timetable_by_section_impl(section_id).await.unwrap();
        assert_eq!(schedule[0].day_of_week, DayOfWeek::Monday);

        assert!(storage.teacher_teaches_section_impl(tid, section_id).await.unwrap());
        assert!(
            !storage
                .teacher_teaches_section_impl(other.teacher.id, section_id)
                .await
                .unwrap()
        );

        // 另一位教师在同一教室同一时段上课
        let candidates = storage
            .list_timetable_candidates_impl(
                DayOfWeek::Monday,
                9999,
                other.teacher.id,
                Some("R-101"),
            )
            .await
            .unwrap();
        assert_eq!(candidates.len(), 1);

        let conflict = find_conflict(
            &SlotCandidate {
                exclude_id: None,
                section_id: 9999,
                teacher_id: other.teacher.id,
                room: Some("R-101"),
                start: parse_clock_time("09:30").unwrap(),
                end: parse_clock_time("10:30").unwrap(),
            },
            &candidates,
        )
        .unwrap();
        assert_eq!(conflict.kind, ConflictKind::Room);

        // 删除教师时其课表级联删除
        assert!(storage.delete_teacher_impl(tid).await.unwrap());
        assert!(
            storage
                .list_timetable_by_section_impl(section_id)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
