//! 考勤存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::attendance::{ActiveModel, Column, Entity as Attendance};
use crate::errors::{CollegeHubError, Result};
use crate::models::attendance::{entities::AttendanceRecord, requests::AttendanceMark};
use crate::utils::sql::map_write_error;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 同一学生同一天只保留一条记录，已存在则覆盖
    pub async fn upsert_attendance_impl(
        &self,
        section_id: i64,
        date: &str,
        marked_by: i64,
        records: Vec<AttendanceMark>,
    ) -> Result<(usize, usize)> {
        if records.is_empty() {
            return Ok((0, 0));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("开启事务失败: {e}")))?;

        let student_ids: Vec<i64> = records.iter().map(|r| r.student_id).collect();
        let mut existing: HashMap<i64, i64> = Attendance::find()
            .filter(Column::Date.eq(date))
            .filter(Column::StudentId.is_in(student_ids))
            .all(&txn)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询考勤失败: {e}")))?
            .into_iter()
            .map(|m| (m.student_id, m.id))
            .collect();

        let now = Self::now();
        let (mut created, mut updated) = (0, 0);

        for record in records {
            let remarks = record
                .remarks
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty());

            match existing.get(&record.student_id) {
                Some(&id) => {
                    ActiveModel {
                        id: Set(id),
                        section_id: Set(section_id),
                        status: Set(record.status.to_string()),
                        remarks: Set(remarks),
                        marked_by: Set(Some(marked_by)),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .update(&txn)
                    .await
                    .map_err(|e| map_write_error(e, "更新考勤失败"))?;
                    updated += 1;
                }
                None => {
                    let inserted = ActiveModel {
                        section_id: Set(section_id),
                        student_id: Set(record.student_id),
                        date: Set(date.to_string()),
                        status: Set(record.status.to_string()),
                        remarks: Set(remarks),
                        marked_by: Set(Some(marked_by)),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| map_write_error(e, "记录考勤失败"))?;
                    // 同一请求内重复的学生按更新处理
                    existing.insert(record.student_id, inserted.id);
                    created += 1;
                }
            }
        }

        txn.commit()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((created, updated))
    }

    pub async fn list_attendance_by_section_date_impl(
        &self,
        section_id: i64,
        date: &str,
    ) -> Result<Vec<AttendanceRecord>> {
        let models = Attendance::find()
            .filter(Column::SectionId.eq(section_id))
            .filter(Column::Date.eq(date))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_record()).collect())
    }

    /// 日期为 YYYY-MM-DD 文本，按字典序比较即按时间比较
    pub async fn list_attendance_by_section_range_impl(
        &self,
        section_id: i64,
        from: &str,
        to: &str,
    ) -> Result<Vec<AttendanceRecord>> {
        let models = Attendance::find()
            .filter(Column::SectionId.eq(section_id))
            .filter(Column::Date.between(from, to))
            .order_by_asc(Column::Date)
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_record()).collect())
    }

    pub async fn list_attendance_by_student_impl(
        &self,
        student_id: i64,
        from: &str,
        to: &str,
    ) -> Result<Vec<AttendanceRecord>> {
        let models = Attendance::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Date.between(from, to))
            .order_by_asc(Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_record()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::{AttendanceStatus, AttendanceSummary};
    use crate::storage::sea_orm_storage::students::tests::{new_student, seed_academics};

    fn mark(student_id: i64, status: AttendanceStatus) -> AttendanceMark {
        AttendanceMark {
            student_id,
            status,
            remarks: None,
        }
    }

    #[tokio::test]
    async fn test_marking_twice_overwrites() {
        let storage = SeaOrmStorage::in_memory().await;
        let ids = seed_academics(&storage).await;
        let alice = storage
            .create_student_impl(new_student("alice", "CS-001", ids))
            .await
            .unwrap();
        let bob = storage
            .create_student_impl(new_student("bob", "CS-002", ids))
            .await
            .unwrap();
        let marker = alice.user.id;
        let (a, b) = (alice.student.id, bob.student.id);

        let first = storage
            .upsert_attendance_impl(
                ids.2,
                "2026-10-12",
                marker,
                vec![mark(a, AttendanceStatus::Present), mark(b, AttendanceStatus::Absent)],
            )
            .await
            .unwrap();
        assert_eq!(first, (2, 0));

        let second = storage
            .upsert_attendance_impl(
                ids.2,
                "2026-10-12",
                marker,
                vec![mark(b, AttendanceStatus::Late)],
            )
            .await
            .unwrap();
        assert_eq!(second, (0, 1));

        let sheet = storage
            .list_attendance_by_section_date_impl(ids.2, "2026-10-12")
            .await
            .unwrap();
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet[1].status, AttendanceStatus::Late);

        storage
            .upsert_attendance_impl(
                ids.2,
                "2026-10-13",
                marker,
                vec![mark(b, AttendanceStatus::Excused)],
            )
            .await
            .unwrap();

        let history = storage
            .list_attendance_by_student_impl(b, "2026-10-01", "2026-10-31")
            .await
            .unwrap();
        let summary = AttendanceSummary::from_statuses(history.iter().map(|r| r.status));
        assert_eq!(summary.total, 2);
        assert_eq!(summary.percentage, 100.0);

        let range = storage
            .list_attendance_by_section_range_impl(ids.2, "2026-10-13", "2026-10-13")
            .await
            .unwrap();
        assert_eq!(range.len(), 1);
    }
}
