use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 出勤状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum AttendanceStatus {
    Present, // 出勤
    Absent,  // 缺勤
    Late,    // 迟到
    Excused, // 请假
}

crate::impl_string_enum!(AttendanceStatus {
    Present => "present",
    Absent => "absent",
    Late => "late",
    Excused => "excused",
});

// 考勤记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub section_id: i64,
    pub student_id: i64,
    // YYYY-MM-DD
    pub date: String,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
    // 记录人（用户ID）
    pub marked_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 出勤统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummary {
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub excused: i64,
    pub total: i64,
    // 出勤率（百分比，两位小数）
    pub percentage: f64,
}

impl AttendanceSummary {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = AttendanceStatus>,
    {
        let mut summary = Self::default();
        for status in statuses {
            summary.add(status);
        }
        summary.finish()
    }

    fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Excused => self.excused += 1,
        }
        self.total += 1;
    }

    /// 迟到计为出勤，请假不计入分母
    fn finish(mut self) -> Self {
        let denominator = self.total - self.excused;
        self.percentage = if denominator <= 0 {
            0.0
        } else {
            let raw = (self.present + self.late) as f64 / denominator as f64 * 100.0;
            (raw * 100.0).round() / 100.0
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttendanceStatus::*;

    #[test]
    fn test_summary_counts_late_as_attended() {
        let s = AttendanceSummary::from_statuses([Present, Late, Absent, Excused]);
        assert_eq!(s.total, 4);
        assert_eq!(s.present, 1);
        assert_eq!(s.late, 1);
        assert_eq!(s.absent, 1);
        assert_eq!(s.excused, 1);
        assert_eq!(s.percentage, 66.67);
    }

    #[test]
    fn test_summary_zero_denominator() {
        assert_eq!(AttendanceSummary::from_statuses([]).percentage, 0.0);
        assert_eq!(AttendanceSummary::from_statuses([Excused, Excused]).percentage, 0.0);
    }

    #[test]
    fn test_summary_full_attendance() {
        let s = AttendanceSummary::from_statuses([Present, Present, Present]);
        assert_eq!(s.percentage, 100.0);
    }
}
