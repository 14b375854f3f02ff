//! 仪表盘统计

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{attendance, fees, students};
use crate::errors::{CollegeHubError, Result};
use crate::models::{
    attendance::entities::AttendanceStatus,
    dashboard::responses::{AttendanceCounts, DashboardStats, FeeTotals},
    fees::entities::FeeStatus,
    students::entities::StudentStatus,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

fn count_err(what: &str) -> impl Fn(sea_orm::DbErr) -> CollegeHubError + '_ {
    move |e| CollegeHubError::database_operation(format!("统计{what}失败: {e}"))
}

/// 汇总学费：减免的学费不计入应收
fn fee_totals<I>(rows: I, today: &str) -> FeeTotals
where
    I: IntoIterator<Item = (i64, i64, String, String)>,
{
    let mut totals = FeeTotals::default();
    for (amount, paid, status, due_date) in rows {
        let status = status.parse::<FeeStatus>().unwrap_or(FeeStatus::Pending);
        totals.collected += paid;
        if status == FeeStatus::Waived {
            continue;
        }
        totals.billed += amount;
        if status.is_open() {
            totals.outstanding += amount - paid;
            if due_date.as_str() < today {
                totals.overdue_count += 1;
            }
        }
    }
    totals
}

impl SeaOrmStorage {
    pub async fn dashboard_stats_impl(&self, today: &str) -> Result<DashboardStats> {
        let db = &self.db;

        let active_students = Students::find()
            .filter(students::Column::Status.eq(StudentStatus::Active.as_str()))
            .count(db)
            .await
            .map_err(count_err("学生"))?;
        let teachers = Teachers::find().count(db).await.map_err(count_err("教师"))?;
        let departments = Departments::find()
            .count(db)
            .await
            .map_err(count_err("院系"))?;
        let programs = Programs::find().count(db).await.map_err(count_err("专业"))?;
        let classes = Classes::find().count(db).await.map_err(count_err("班级"))?;
        let sections = Sections::find().count(db).await.map_err(count_err("分班"))?;

        let mut attendance_today = AttendanceCounts::default();
        let grouped: Vec<(String, i64)> = Attendance::find()
            .select_only()
            .column(attendance::Column::Status)
            .column_as(attendance::Column::Id.count(), "count")
            .filter(attendance::Column::Date.eq(today))
            .group_by(attendance::Column::Status)
            .into_tuple()
            .all(db)
            .await
            .map_err(count_err("考勤"))?;
        for (status, count) in grouped {
            match status.parse::<AttendanceStatus>() {
                Ok(AttendanceStatus::Present) => attendance_today.present += count,
                Ok(AttendanceStatus::Absent) => attendance_today.absent += count,
                Ok(AttendanceStatus::Late) => attendance_today.late += count,
                Ok(AttendanceStatus::Excused) => attendance_today.excused += count,
                Err(_) => {}
            }
        }

        let fee_rows: Vec<(i64, i64, String, String)> = Fees::find()
            .select_only()
            .column(fees::Column::Amount)
            .column(fees::Column::PaidAmount)
            .column(fees::Column::Status)
            .column(fees::Column::DueDate)
            .into_tuple()
            .all(db)
            .await
            .map_err(count_err("学费"))?;

        Ok(DashboardStats {
            active_students: active_students as i64,
            teachers: teachers as i64,
            departments: departments as i64,
            programs: programs as i64,
            classes: classes as i64,
            sections: sections as i64,
            attendance_today,
            fees: fee_totals(fee_rows, today),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(amount: i64, paid: i64, status: FeeStatus, due: &str) -> (i64, i64, String, String) {
        (amount, paid, status.to_string(), due.to_string())
    }

    #[test]
    fn test_fee_totals() {
        let totals = fee_totals(
            vec![
                row(1000, 0, FeeStatus::Pending, "2026-01-01"),
                row(1000, 400, FeeStatus::Partial, "2026-12-01"),
                row(1000, 1000, FeeStatus::Paid, "2026-01-01"),
                row(1000, 0, FeeStatus::Waived, "2026-01-01"),
            ],
            "2026-10-17",
        );
        assert_eq!(totals.billed, 3000);
        assert_eq!(totals.collected, 1400);
        assert_eq!(totals.outstanding, 1600);
        assert_eq!(totals.overdue_count, 1);
    }

    #[tokio::test]
    async fn test_empty_database_stats() {
        let storage = SeaOrmStorage::in_memory().await;
        let stats = storage.dashboard_stats_impl("2026-10-17").await.unwrap();
        assert_eq!(stats.active_students, 0);
        assert_eq!(stats.fees.billed, 0);
        assert_eq!(stats.attendance_today.present, 0);
    }
}
